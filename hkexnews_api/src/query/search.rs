use chrono::{Datelike, NaiveDate};

use crate::{types::SessionState, Error};

use super::{
    common::{FormPayload, FormQuery},
    fields,
};

/// Advanced search for one stock code over a release-date range.
///
/// Dates are inclusive calendar days; the portal has no time-of-day filter.
/// The stock name field is always sent blank, so matching is by code only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    stock_code: String,
    from_date: NaiveDate,
    to_date: NaiveDate,
}

impl SearchQuery {
    /// Creates a query from already-parsed dates.
    pub fn new(stock_code: &str, from_date: NaiveDate, to_date: NaiveDate) -> Result<Self, Error> {
        if from_date > to_date {
            return Err(Error::InvalidDateRange {
                from: from_date,
                to: to_date,
            });
        }
        Ok(Self {
            stock_code: stock_code.to_string(),
            from_date,
            to_date,
        })
    }

    /// Creates a query from `YYYY-MM-DD` strings.
    pub fn parse(stock_code: &str, from_date: &str, to_date: &str) -> Result<Self, Error> {
        let from = parse_form_date("from", from_date)?;
        let to = parse_form_date("to", to_date)?;
        Self::new(stock_code, from, to)
    }

    pub fn stock_code(&self) -> &str {
        &self.stock_code
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from_date
    }

    pub fn to_date(&self) -> NaiveDate {
        self.to_date
    }
}

impl FormQuery for SearchQuery {
    fn to_form(&self, session: &SessionState) -> FormPayload {
        let mut form = FormPayload::new();
        form.echo(session, fields::ECHOED_ON_SEARCH)
            .set(fields::VIEWSTATE_ENCRYPTED, "")
            .set(fields::HF_ALERT, "")
            .set(fields::STOCK_CODE, self.stock_code.as_str())
            .set(fields::STOCK_NAME, "");
        for (name, value) in fields::SEARCH_DEFAULTS {
            form.set(name, *value);
        }
        set_date(
            &mut form,
            self.from_date,
            (fields::DATE_FROM_DAY, fields::DATE_FROM_MONTH, fields::DATE_FROM_YEAR),
        );
        set_date(
            &mut form,
            self.to_date,
            (fields::DATE_TO_DAY, fields::DATE_TO_MONTH, fields::DATE_TO_YEAR),
        );
        form.set(fields::DEFAULT_DATE_RANGE.0, fields::DEFAULT_DATE_RANGE.1)
            .set(fields::SORT_BY.0, fields::SORT_BY.1);
        form
    }
}

fn set_date(form: &mut FormPayload, date: NaiveDate, (day, month, year): (&str, &str, &str)) {
    form.set(day, format!("{:02}", date.day()))
        .set(month, format!("{:02}", date.month()))
        .set(year, format!("{:04}", date.year()));
}

fn parse_form_date(field: &'static str, input: &str) -> Result<NaiveDate, Error> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| Error::InvalidDateFormat {
        field,
        input: trimmed.to_string(),
    })
}
