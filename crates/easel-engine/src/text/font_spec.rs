use std::fmt;

/// Font size plus family list, written as `"<size>px <family>"`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Size in pixels.
    pub size: f32,
    /// Comma-separated family list, first match wins.
    pub family: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self { size: 10.0, family: "sans-serif".to_string() }
    }
}

impl FontSpec {
    pub fn new(size: f32, family: impl Into<String>) -> Self {
        Self { size, family: family.into() }
    }

    /// Parses `"16px monospace"`. Leading style words (`"bold 16px serif"`) are skipped.
    ///
    /// Returns `None` when no positive `<n>px` token is followed by a family.
    pub fn parse(s: &str) -> Option<Self> {
        let mut words = s.split_whitespace();
        let size = words.by_ref().find_map(|w| w.strip_suffix("px")?.parse::<f32>().ok())?;
        let family = words.collect::<Vec<_>>().join(" ");

        if family.is_empty() || !(size.is_finite() && size > 0.0) {
            return None;
        }
        Some(Self { size, family })
    }

    /// Same size, different family.
    #[must_use]
    pub fn with_family(&self, family: impl Into<String>) -> Self {
        Self { size: self.size, family: family.into() }
    }

    /// Same family, different size.
    #[must_use]
    pub fn with_size(&self, size: f32) -> Self {
        Self { size, family: self.family.clone() }
    }

    /// Family names with surrounding quotes removed, in preference order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.family
            .split(',')
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|f| !f.is_empty())
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}", self.size, self.family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_size_and_family() {
        let spec = FontSpec::parse("16px monospace").unwrap();
        assert_eq!(spec, FontSpec::new(16.0, "monospace"));
        assert_eq!(spec.to_string(), "16px monospace");
    }

    #[test]
    fn skips_style_words_and_keeps_multi_word_family() {
        let spec = FontSpec::parse("bold 12.5px Fira Code, monospace").unwrap();
        assert_eq!(spec.size, 12.5);
        assert_eq!(spec.family, "Fira Code, monospace");
        assert_eq!(spec.families().collect::<Vec<_>>(), ["Fira Code", "monospace"]);
    }

    #[test]
    fn rejects_missing_parts() {
        assert!(FontSpec::parse("monospace").is_none());
        assert!(FontSpec::parse("16px").is_none());
        assert!(FontSpec::parse("0px serif").is_none());
    }

    #[test]
    fn patches_one_field() {
        let base = FontSpec::default();
        assert_eq!(base.with_size(24.0).to_string(), "24px sans-serif");
        assert_eq!(base.with_family("serif").to_string(), "10px serif");
    }

    #[test]
    fn quoted_families_are_unquoted() {
        let spec = FontSpec::new(9.0, "\"DejaVu Sans\", 'Noto Sans'");
        assert_eq!(spec.families().collect::<Vec<_>>(), ["DejaVu Sans", "Noto Sans"]);
    }
}
