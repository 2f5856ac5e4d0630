mod announcement;
pub use self::announcement::{announcement_id, AnnouncementRecord};

mod session;
pub use self::session::{SessionState, VIEWSTATE, VIEWSTATE_GENERATOR};
