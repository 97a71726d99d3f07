pub trait FormatHM {
    fn format_hm(&self) -> String;
}

/// Minutes rendered as `HH:MM`, negative values keep their sign.
impl FormatHM for f64 {
    fn format_hm(&self) -> String {
        let sign = if *self < 0.0 { "-" } else { "" };
        let minutes = self.abs().round() as i64;
        format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
    }
}
