//! Search parameters and PatFT URL construction

use anyhow::{bail, Result};
use chrono::{Datelike, Duration, NaiveDate};

/// Scheme and host of the PatFT search system. Results pages link to
/// detail pages site-relatively, so this is also the link prefix.
pub const SITE_ROOT: &str = "http://patft.uspto.gov";

/// Results per page, fixed by the `l=` parameter of the search URL.
pub const PAGE_SIZE: u32 = 50;

/// One patent search: inventor city and state plus an award-date window.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub city: String,
    pub state: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SearchQuery {
    pub fn new(
        city: &str,
        state: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self> {
        if start_date > end_date {
            bail!(
                "search window starts {} but ends {}",
                start_date,
                end_date
            );
        }
        Ok(Self {
            city: city.to_string(),
            state: state.to_string(),
            start_date,
            end_date,
        })
    }

    /// Window covering the last `days` days, ending at `today`.
    pub fn last_days(city: &str, state: &str, days: i64, today: NaiveDate) -> Result<Self> {
        Self::new(city, state, today - Duration::days(days), today)
    }

    /// Advanced-search URL for one results page of this query, built
    /// exactly as the search form submits it. Spaces in the city become
    /// `+`; the page number rides in `p`.
    pub fn results_url(&self, page: u32) -> String {
        let city = self.city.replace(' ', "+");
        format!(
            "{}/netacgi/nph-Parser?Sect1=PTO2&Sect2=HITOFF&p={}\
             &u=%2Fnetahtml%2FPTO%2Fsearch-adv.htm&r=0&f=S&l={}&d=PTXT\
             &Query=ic%2F%22{}%22+and+is%2F%22{}%22+and+isd%2F{}-%3E{}",
            SITE_ROOT,
            page,
            PAGE_SIZE,
            city,
            self.state,
            encoded_date(self.start_date),
            encoded_date(self.end_date),
        )
    }
}

/// Encode a date the way the search form does: `m%2Fd%2Fyyyy`, month and
/// day without leading zeros.
fn encoded_date(date: NaiveDate) -> String {
    format!("{}%2F{}%2F{}", date.month(), date.day(), date.year())
}
