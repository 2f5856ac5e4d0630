//! Form field names and fixed values of the advanced-search form.
//!
//! These belong to the portal, not to us. When the portal changes its form,
//! this is the only file that should need editing.

pub const VIEWSTATE: &str = crate::types::VIEWSTATE;
pub const VIEWSTATE_GENERATOR: &str = crate::types::VIEWSTATE_GENERATOR;
pub const VIEWSTATE_ENCRYPTED: &str = "__VIEWSTATEENCRYPTED";

pub const TXT_TODAY: &str = "ctl00$txt_today";
pub const HF_STATUS: &str = "ctl00$hfStatus";
pub const HF_ALERT: &str = "ctl00$hfAlert";

pub const STOCK_CODE: &str = "ctl00$txt_stock_code";
pub const STOCK_NAME: &str = "ctl00$txt_stock_name";
pub const KEYWORD: &str = "ctl00$txtKeyWord";

pub const DATE_FROM_DAY: &str = "ctl00$sel_DateOfReleaseFrom_d";
pub const DATE_FROM_MONTH: &str = "ctl00$sel_DateOfReleaseFrom_m";
pub const DATE_FROM_YEAR: &str = "ctl00$sel_DateOfReleaseFrom_y";
pub const DATE_TO_DAY: &str = "ctl00$sel_DateOfReleaseTo_d";
pub const DATE_TO_MONTH: &str = "ctl00$sel_DateOfReleaseTo_m";
pub const DATE_TO_YEAR: &str = "ctl00$sel_DateOfReleaseTo_y";

/// Fields echoed from the previous form on a search submission.
pub const ECHOED_ON_SEARCH: &[&str] = &[VIEWSTATE, VIEWSTATE_GENERATOR, TXT_TODAY, HF_STATUS];

/// Filters the caller cannot change: all document types, manual date range,
/// sorted by release time.
pub const SEARCH_DEFAULTS: &[(&str, &str)] = &[
    ("ctl00$rdo_SelectDocType", "rbAll"),
    ("ctl00$sel_tier_1", "-2"),
    ("ctl00$sel_DocTypePrior2006", "-1"),
    ("ctl00$sel_tier_2_group", "-2"),
    ("ctl00$sel_tier_2", "-2"),
    ("ctl00$ddlTierTwo", "59,1,7"),
    ("ctl00$ddlTierTwoGroup", "26,5"),
    (KEYWORD, ""),
    ("ctl00$rdo_SelectDateOfRelease", "rbManualRange"),
];

pub const DEFAULT_DATE_RANGE: (&str, &str) = ("ctl00$sel_defaultDateRange", "SevenDays");
pub const SORT_BY: (&str, &str) = ("ctl00$rdo_SelectSortBy", "rbDateTime");

/// Image button of the pager. Image inputs submit click coordinates as
/// `name.x` / `name.y`.
pub const NEXT_BUTTON: &str = "ctl00$btnNext2";
pub const NEXT_BUTTON_CLICK: (u32, u32) = (22, 8);
