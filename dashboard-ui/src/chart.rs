//! SVG geometry for the blood-pressure chart.
//!
//! Missing readings split a line into separate segments so the chart shows
//! a gap instead of dropping to the axis.

const PAD_LEFT: f64 = 40.0;
const PAD_RIGHT: f64 = 16.0;
const PAD_TOP: f64 = 12.0;
const PAD_BOTTOM: f64 = 30.0;

/// Upper bound on gridline intervals, whatever the readings.
const MAX_STEPS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartScale {
    pub width: f64,
    pub height: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ChartScale {
    fn default() -> Self {
        Self {
            width: 520.0,
            height: 220.0,
            min: 60.0,
            max: 180.0,
            step: 20.0,
        }
    }
}

impl ChartScale {
    /// Default scale widened, on step boundaries, to contain every value.
    /// The step grows with the range so there are never more than
    /// `MAX_STEPS` intervals plus alignment.
    pub fn fitting(values: impl IntoIterator<Item = f64>) -> Self {
        let mut scale = Self::default();
        let (mut low, mut high) = (scale.min, scale.max);
        for value in values.into_iter().filter(|value| value.is_finite()) {
            low = low.min(value);
            high = high.max(value);
        }

        let span = high - low;
        if span / scale.step > MAX_STEPS as f64 {
            scale.step = nice_step(span / MAX_STEPS as f64);
        }
        scale.min = (low / scale.step).floor() * scale.step;
        scale.max = (high / scale.step).ceil() * scale.step;
        scale
    }

    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    pub fn plot_left(&self) -> f64 {
        PAD_LEFT
    }

    pub fn plot_right(&self) -> f64 {
        self.width - PAD_RIGHT
    }

    pub fn label_baseline(&self) -> f64 {
        self.height - 8.0
    }

    pub fn x(&self, index: usize, count: usize) -> f64 {
        let plot_width = self.plot_right() - self.plot_left();
        if count <= 1 {
            return self.plot_left() + plot_width / 2.0;
        }
        self.plot_left() + plot_width * index as f64 / (count - 1) as f64
    }

    pub fn y(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        let plot_height = self.height - PAD_TOP - PAD_BOTTOM;
        PAD_TOP + plot_height * (self.max - clamped) / (self.max - self.min)
    }

    /// Gridline values from `min` to `max` with their vertical positions.
    pub fn ticks(&self) -> Vec<(f64, f64)> {
        let steps = ((self.max - self.min) / self.step).round();
        let steps = if steps.is_finite() && steps > 0.0 {
            (steps as usize).min(MAX_STEPS + 2)
        } else {
            0
        };
        (0..=steps)
            .map(|i| {
                let value = self.min + self.step * i as f64;
                (value, self.y(value))
            })
            .collect()
    }
}

/// Smallest 1, 2 or 5 times a power of ten that is at least `raw`.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// SVG path data, one string per run of consecutive present values.
pub fn line_segments(values: &[Option<f64>], scale: &ChartScale) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for (index, value) in values.iter().enumerate() {
        match value {
            Some(value) => {
                let command = if current.is_empty() { 'M' } else { 'L' };
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(&format!(
                    "{command} {:.1} {:.1}",
                    scale.x(index, values.len()),
                    scale.y(*value)
                ));
            }
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Point markers for every present value.
pub fn markers(values: &[Option<f64>], scale: &ChartScale) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            value.map(|value| (scale.x(index, values.len()), scale.y(value)))
        })
        .collect()
}
