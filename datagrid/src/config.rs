use crate::ConfigError;

pub const DEFAULT_ROW_HEIGHT: f64 = 48.0;
pub const DEFAULT_OVERSCAN: usize = 5;
pub const DEFAULT_CONTAINER_HEIGHT: f64 = 600.0;
pub const DEFAULT_SCROLL_THRESHOLD_ROWS: usize = 10;

/// Configuration for one windowing session.
///
/// Immutable for the lifetime of a mounted grid. Build it with [`VirtualizationConfig::merge`]
/// (caller overrides on top of the defaults) or the `with_*` setters, then call
/// [`VirtualizationConfig::validate`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualizationConfig {
    /// Row height in pixels, constant across all rows.
    pub row_height: f64,
    /// Rows rendered beyond the strictly visible range on each side.
    pub overscan: usize,
    /// Height of the scroll container in pixels.
    pub container_height: f64,
    /// How close (in rows) the window may get to the end of the loaded rows before more are
    /// requested.
    pub scroll_threshold_rows: usize,
    pub show_scroll_indicator: bool,
}

impl Default for VirtualizationConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            container_height: DEFAULT_CONTAINER_HEIGHT,
            scroll_threshold_rows: DEFAULT_SCROLL_THRESHOLD_ROWS,
            show_scroll_indicator: true,
        }
    }
}

/// Caller-supplied partial configuration. `None` fields keep the default.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VirtualizationOverrides {
    pub row_height: Option<f64>,
    pub overscan: Option<usize>,
    pub container_height: Option<f64>,
    pub scroll_threshold_rows: Option<usize>,
    pub show_scroll_indicator: Option<bool>,
}

impl VirtualizationConfig {
    /// Applies `overrides` over the defaults and validates the result.
    pub fn merge(overrides: VirtualizationOverrides) -> Result<Self, ConfigError> {
        let d = Self::default();
        let config = Self {
            row_height: overrides.row_height.unwrap_or(d.row_height),
            overscan: overrides.overscan.unwrap_or(d.overscan),
            container_height: overrides.container_height.unwrap_or(d.container_height),
            scroll_threshold_rows: overrides
                .scroll_threshold_rows
                .unwrap_or(d.scroll_threshold_rows),
            show_scroll_indicator: overrides
                .show_scroll_indicator
                .unwrap_or(d.show_scroll_indicator),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            gwarn!(row_height = self.row_height, "rejected row height");
            return Err(ConfigError::InvalidRowHeight(self.row_height));
        }
        if !(self.container_height.is_finite() && self.container_height >= 0.0) {
            gwarn!(
                container_height = self.container_height,
                "rejected container height"
            );
            return Err(ConfigError::InvalidViewportHeight(self.container_height));
        }
        Ok(())
    }

    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_container_height(mut self, container_height: f64) -> Self {
        self.container_height = container_height;
        self
    }

    pub fn with_scroll_threshold_rows(mut self, rows: usize) -> Self {
        self.scroll_threshold_rows = rows;
        self
    }

    pub fn with_show_scroll_indicator(mut self, show: bool) -> Self {
        self.show_scroll_indicator = show;
        self
    }
}
