use crate::error::HazeError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2} \w{3} \d{4}").expect("date pattern should be valid"));

static HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d\d)\d\d").expect("hour pattern should be valid"));

static OPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("option").expect("option selector should be valid"));

/// Find a "19 Jun 2014" style date in header text and return its midnight at `offset`.
pub fn parse_header_date(text: &str, offset: FixedOffset) -> Result<DateTime<FixedOffset>, HazeError> {
    let text = text.trim();
    let found = DATE
        .find(text)
        .ok_or_else(|| HazeError::ParseFailure(format!("no date found in header '{}'", text)))?;

    let date = NaiveDate::parse_from_str(found.as_str(), "%d %b %Y").map_err(|e| {
        HazeError::ParseFailure(format!("invalid header date '{}': {}", found.as_str(), e))
    })?;

    offset
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .ok_or_else(|| {
            HazeError::ParseFailure(format!("header date '{}' has no single instant", date))
        })
}

/// Extract the hour from an "HHMM" control value such as "1300".
pub fn parse_as_of_hour(value: &str) -> Result<u32, HazeError> {
    let caps = HOUR.captures(value).ok_or_else(|| {
        HazeError::ParseFailure(format!("as-of value '{}' is not of the form HHMM", value.trim()))
    })?;
    let hour: u32 = caps[1]
        .parse()
        .map_err(|e| HazeError::ParseFailure(format!("invalid as-of hour '{}': {}", &caps[1], e)))?;
    if hour > 24 {
        return Err(HazeError::ParseFailure(format!(
            "as-of hour {} is out of range",
            hour
        )));
    }
    Ok(hour)
}

/// Current value of a form control.
///
/// For a `<select>`: the selected option, else the first option. Otherwise the
/// `value` attribute, falling back to the element text.
pub fn as_of_value(control: ElementRef<'_>) -> Option<String> {
    let options: Vec<ElementRef<'_>> = control.select(&OPTION).collect();
    let option = options
        .iter()
        .find(|o| o.value().attr("selected").is_some())
        .or_else(|| options.first());

    if let Some(option) = option {
        return Some(
            option
                .value()
                .attr("value")
                .map(str::to_string)
                .unwrap_or_else(|| option.text().collect::<String>()),
        );
    }

    if let Some(value) = control.value().attr("value") {
        return Some(value.to_string());
    }

    let text: String = control.text().collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn sgt() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_header_date_in_sentence() {
        let dt = parse_header_date("  24-hr Pollutant Concentrations on 19 Jun 2014 ", sgt()).unwrap();
        assert_eq!(dt, sgt().with_ymd_and_hms(2014, 6, 19, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_header_date_single_digit_day() {
        let dt = parse_header_date("1-hr PM2.5 readings (3 Mar 2015)", sgt()).unwrap();
        assert_eq!(dt, sgt().with_ymd_and_hms(2015, 3, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_header_date_missing() {
        assert!(matches!(
            parse_header_date("Pollutant Concentrations", sgt()),
            Err(HazeError::ParseFailure(_))
        ));
    }

    #[test]
    fn test_header_date_bad_month() {
        assert!(parse_header_date("19 Foo 2014", sgt()).is_err());
    }

    #[test]
    fn test_as_of_hour() {
        assert_eq!(parse_as_of_hour("1300").unwrap(), 13);
        assert_eq!(parse_as_of_hour("0100").unwrap(), 1);
        assert_eq!(parse_as_of_hour("2400").unwrap(), 24);
    }

    #[test]
    fn test_as_of_hour_rejects_garbage() {
        assert!(parse_as_of_hour("1pm").is_err());
        assert!(parse_as_of_hour("2500").is_err());
    }

    fn control_value(html: &str) -> Option<String> {
        let doc = Html::parse_document(html);
        let sel = Selector::parse("#t").unwrap();
        as_of_value(doc.select(&sel).next().unwrap())
    }

    #[test]
    fn test_selected_option_wins() {
        let v = control_value(
            r#"<select id="t"><option value="1200">12pm</option>
               <option value="1300" selected="selected">1pm</option></select>"#,
        );
        assert_eq!(v.as_deref(), Some("1300"));
    }

    #[test]
    fn test_first_option_without_selection() {
        let v = control_value(
            r#"<select id="t"><option value="0900">9am</option><option value="1000">10am</option></select>"#,
        );
        assert_eq!(v.as_deref(), Some("0900"));
    }

    #[test]
    fn test_input_value_attribute() {
        let v = control_value(r#"<input id="t" value="1700">"#);
        assert_eq!(v.as_deref(), Some("1700"));
    }

    #[test]
    fn test_empty_control() {
        assert_eq!(control_value(r#"<span id="t"> </span>"#), None);
    }
}
