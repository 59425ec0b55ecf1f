//! Historical price chart requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationFault;

/// Spacing between chart points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartInterval {
    #[serde(rename = "15second")]
    Second15,
    #[serde(rename = "5minute")]
    Minute5,
    #[serde(rename = "10minute")]
    Minute10,
    #[serde(rename = "hour")]
    Hour,
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "week")]
    Week,
}

impl ChartInterval {
    /// Path segment understood by the remote service.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartInterval::Second15 => "15second",
            ChartInterval::Minute5 => "5minute",
            ChartInterval::Minute10 => "10minute",
            ChartInterval::Hour => "hour",
            ChartInterval::Day => "day",
            ChartInterval::Week => "week",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartInterval::Second15 => "15 seconds",
            ChartInterval::Minute5 => "5 minutes",
            ChartInterval::Minute10 => "10 minutes",
            ChartInterval::Hour => "1 hour",
            ChartInterval::Day => "1 day",
            ChartInterval::Week => "1 week",
        }
    }

    pub fn all() -> &'static [ChartInterval] {
        &[
            ChartInterval::Second15,
            ChartInterval::Minute5,
            ChartInterval::Minute10,
            ChartInterval::Hour,
            ChartInterval::Day,
            ChartInterval::Week,
        ]
    }
}

impl fmt::Display for ChartInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChartInterval {
    type Err = ValidationFault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|i| i.as_str() == s.trim())
            .ok_or_else(|| ValidationFault::UnknownInterval(s.to_string()))
    }
}

/// Total time covered by a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartSpan {
    #[serde(rename = "hour")]
    Hour,
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "3month")]
    Month3,
    #[serde(rename = "year")]
    Year,
    #[serde(rename = "5year")]
    Year5,
}

impl ChartSpan {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartSpan::Hour => "hour",
            ChartSpan::Day => "day",
            ChartSpan::Week => "week",
            ChartSpan::Month => "month",
            ChartSpan::Month3 => "3month",
            ChartSpan::Year => "year",
            ChartSpan::Year5 => "5year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartSpan::Hour => "1 hour",
            ChartSpan::Day => "1 day",
            ChartSpan::Week => "1 week",
            ChartSpan::Month => "1 month",
            ChartSpan::Month3 => "3 months",
            ChartSpan::Year => "1 year",
            ChartSpan::Year5 => "5 years",
        }
    }

    pub fn all() -> &'static [ChartSpan] {
        &[
            ChartSpan::Hour,
            ChartSpan::Day,
            ChartSpan::Week,
            ChartSpan::Month,
            ChartSpan::Month3,
            ChartSpan::Year,
            ChartSpan::Year5,
        ]
    }
}

impl fmt::Display for ChartSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChartSpan {
    type Err = ValidationFault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|span| span.as_str() == s.trim())
            .ok_or_else(|| ValidationFault::UnknownSpan(s.to_string()))
    }
}

/// Price series that can be plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    HighPrice,
    LowPrice,
    OpenPrice,
    ClosePrice,
}

impl PriceField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::HighPrice => "high_price",
            PriceField::LowPrice => "low_price",
            PriceField::OpenPrice => "open_price",
            PriceField::ClosePrice => "close_price",
        }
    }
}

impl FromStr for PriceField {
    type Err = ValidationFault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "high_price" => Ok(PriceField::HighPrice),
            "low" | "low_price" => Ok(PriceField::LowPrice),
            "open" | "open_price" => Ok(PriceField::OpenPrice),
            "close" | "close_price" => Ok(PriceField::ClosePrice),
            _ => Err(ValidationFault::UnknownPriceField(s.to_string())),
        }
    }
}

/// A validated chart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub symbol: String,
    pub interval: ChartInterval,
    pub span: ChartSpan,
    pub fields: Vec<PriceField>,
}

impl ChartRequest {
    /// Build a request from the user's selections.
    ///
    /// Checks run in the order the selections appear on screen: symbol,
    /// interval, span, then at least one price field.
    pub fn try_new(
        symbol: Option<&str>,
        interval: Option<ChartInterval>,
        span: Option<ChartSpan>,
        fields: &[PriceField],
    ) -> Result<Self, ValidationFault> {
        let symbol = symbol
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationFault::MissingSymbol)?;
        let interval = interval.ok_or(ValidationFault::MissingInterval)?;
        let span = span.ok_or(ValidationFault::MissingSpan)?;

        let mut unique = Vec::with_capacity(fields.len());
        for field in fields {
            if !unique.contains(field) {
                unique.push(*field);
            }
        }
        if unique.is_empty() {
            return Err(ValidationFault::MissingPriceField);
        }

        Ok(Self {
            symbol: symbol.to_uppercase(),
            interval,
            span,
            fields: unique,
        })
    }

    /// Comma-separated field list for the request path.
    pub fn fields_param(&self) -> String {
        self.fields
            .iter()
            .map(PriceField::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn title(&self) -> String {
        format!(
            "{}: Time vs. Price (Every {} over {})",
            self.symbol,
            self.interval.label(),
            self.span.label()
        )
    }
}

/// Chart data and the rendered image returned by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    /// Raw candle data, passed back verbatim when asking for commentary
    pub data: serde_json::Value,
    /// Base64-encoded PNG
    pub image: String,
}

impl ChartPayload {
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.image)
    }

    pub fn candle_count(&self) -> usize {
        self.data.as_array().map_or(0, Vec::len)
    }
}
