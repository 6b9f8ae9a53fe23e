use std::fmt::Display;

/// A number of seconds rendered as `HH:MM:SS.mmm`.
///
/// Hours are not wrapped at 24 and grow past two digits when needed.
///
/// # Examples
/// ```
/// use mpls_chapters::HumanDuration;
///
/// assert_eq!(HumanDuration(3661.5).to_string(), "01:01:01.500");
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HumanDuration(pub f64);

impl Display for HumanDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secs = self.0;
        let hours = (secs / 3600.0).floor();
        let minutes = ((secs % 3600.0) / 60.0).floor();
        write!(f, "{:02.0}:{:02.0}:{:06.3}", hours, minutes, secs % 60.0)
    }
}

/// Formats a number of seconds as `HH:MM:SS.mmm`.
pub fn format_duration(seconds: f64) -> String {
    HumanDuration(seconds).to_string()
}
