use serde::{Deserialize, Serialize};

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(TextAlign::Left),
            "center" | "middle" => Some(TextAlign::Center),
            "right" | "end" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn from_css(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        match value.as_str() {
            "bold" | "bolder" => Some(FontWeight::Bold),
            "normal" | "lighter" => Some(FontWeight::Normal),
            numeric => numeric.parse::<u16>().ok().map(|w| {
                if w >= 600 { FontWeight::Bold } else { FontWeight::Normal }
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "italic" | "oblique" => Some(FontStyle::Italic),
            "normal" => Some(FontStyle::Normal),
            _ => None,
        }
    }
}

/// Visual style overlay for one cell.
///
/// Every attribute is optional; `None` means "inherit the default", so an
/// all-`None` value is the default style and is never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CellFormatting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_header: Option<bool>,
}

impl CellFormatting {
    pub fn is_default(&self) -> bool {
        *self == CellFormatting::default()
    }

    /// Overlay every attribute `patch` sets onto `self`.
    pub fn merge(&mut self, patch: &CellFormatting) {
        fn take<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if let Some(v) = src {
                *dst = Some(v.clone());
            }
        }
        take(&mut self.background_color, &patch.background_color);
        take(&mut self.text_color, &patch.text_color);
        take(&mut self.font_weight, &patch.font_weight);
        take(&mut self.font_style, &patch.font_style);
        take(&mut self.border, &patch.border);
        take(&mut self.text_align, &patch.text_align);
        take(&mut self.font_size, &patch.font_size);
        take(&mut self.font_family, &patch.font_family);
        take(&mut self.text_decoration, &patch.text_decoration);
        take(&mut self.is_header, &patch.is_header);
    }

    pub fn merged(mut self, patch: &CellFormatting) -> Self {
        self.merge(patch);
        self
    }

    pub fn bold() -> Self {
        Self {
            font_weight: Some(FontWeight::Bold),
            ..Self::default()
        }
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }

    // Resolved accessors: what a renderer should use.

    pub fn weight(&self) -> FontWeight {
        self.font_weight.unwrap_or_default()
    }

    pub fn style(&self) -> FontStyle {
        self.font_style.unwrap_or_default()
    }

    pub fn alignment(&self) -> TextAlign {
        self.text_align.unwrap_or_default()
    }

    pub fn header(&self) -> bool {
        self.is_header.unwrap_or(false)
    }
}

/// A cell value together with its style, as extracted from a styled source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormattedCellData {
    pub value: String,
    pub formatting: CellFormatting,
}

impl FormattedCellData {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            formatting: CellFormatting::default(),
        }
    }
}
