use chrono::{DateTime, NaiveDateTime, Utc};

/// Join folded continuation lines back onto their property line
pub fn unfold(ics: &str) -> String {
    ics.replace("\r\n ", "")
}

/// Unfolded content of each VEVENT, in document order
pub fn event_blocks(ics: &str) -> Vec<String> {
    unfold(ics)
        .split("BEGIN:VEVENT\r\n")
        .skip(1)
        .map(|rest| {
            rest.split("END:VEVENT\r\n")
                .next()
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

/// Value of the first `name` property in an unfolded block
pub fn property<'a>(block: &'a str, name: &str) -> Option<&'a str> {
    let prefix = format!("{}:", name);
    block
        .split("\r\n")
        .find_map(|line| line.strip_prefix(prefix.as_str()))
}

pub fn parse_timestamp(value: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ")
        .unwrap_or_else(|e| panic!("'{}' is not a UTC timestamp: {}", value, e))
        .and_utc()
}

/// Checks the VCALENDAR envelope and the physical line rules of a document
pub fn assert_calendar_document(ics: &str) {
    assert!(
        ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"),
        "Calendar must open with BEGIN:VCALENDAR and VERSION"
    );
    assert!(
        ics.ends_with("END:VCALENDAR\r\n"),
        "Calendar must end with END:VCALENDAR"
    );
    assert!(ics.contains("\r\nPRODID:"), "Missing PRODID");
    assert!(ics.contains("\r\nCALSCALE:GREGORIAN\r\n"), "Missing CALSCALE");

    let lines: Vec<&str> = ics.trim_end_matches("\r\n").split("\r\n").collect();
    for line in &lines {
        assert!(!line.contains('\n'), "Bare LF in line {:?}", line);
        assert!(!line.contains('\r'), "Bare CR in line {:?}", line);
        if let Some(continuation) = line.strip_prefix(' ') {
            assert!(
                continuation.chars().count() <= 75,
                "Continuation line longer than 75 characters: {:?}",
                line
            );
        }
    }

    assert_eq!(
        ics.matches("BEGIN:VEVENT\r\n").count(),
        ics.matches("END:VEVENT\r\n").count(),
        "Unbalanced VEVENT blocks"
    );
}
