//! Periodic waveform families.
//!
//! Every built-in waveform is evaluated on the phase `u = (t mod T) / T`
//! (Euclidean remainder, so negative times wrap correctly), which makes
//! `f(t) == f(t + T)` hold by construction. Custom expressions are evaluated
//! as written; their periodicity is the caller's responsibility.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::expression::Expression;
use crate::function::{FunctionKey, PeriodicFunction};
use crate::time_grid::validate_time_grid;

/// Duty cycle used for a pulse train when none is given.
pub const DEFAULT_DUTY_CYCLE: f64 = 0.2;

/// Waveform family selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveformKind {
    Square,
    Triangle,
    Sawtooth,
    #[serde(rename = "half_wave")]
    HalfWaveRectified,
    PulseTrain,
    Custom,
}

impl WaveformKind {
    pub const ALL: [WaveformKind; 6] = [
        WaveformKind::Square,
        WaveformKind::Triangle,
        WaveformKind::Sawtooth,
        WaveformKind::HalfWaveRectified,
        WaveformKind::PulseTrain,
        WaveformKind::Custom,
    ];

    /// Short identifier, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            WaveformKind::Square => "square",
            WaveformKind::Triangle => "triangle",
            WaveformKind::Sawtooth => "sawtooth",
            WaveformKind::HalfWaveRectified => "half_wave",
            WaveformKind::PulseTrain => "pulse_train",
            WaveformKind::Custom => "custom",
        }
    }

    /// Human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            WaveformKind::Square => "Square Wave",
            WaveformKind::Triangle => "Triangle Wave",
            WaveformKind::Sawtooth => "Sawtooth Wave",
            WaveformKind::HalfWaveRectified => "Half-Wave Rectified Sine",
            WaveformKind::PulseTrain => "Pulse Train",
            WaveformKind::Custom => "Custom Function",
        }
    }

    /// Defining formula in terms of amplitude `A`, period `T` and duty `d`.
    pub fn formula(self) -> &'static str {
        match self {
            WaveformKind::Square => "A if (t mod T) < T/2 else -A",
            WaveformKind::Triangle => "A(2|2((t mod T)/T - 1/2)| - 1)",
            WaveformKind::Sawtooth => "A(2(t mod T)/T - 1)",
            WaveformKind::HalfWaveRectified => "max(0, A sin(2 pi t/T))",
            WaveformKind::PulseTrain => "A if (t mod T) < d T else 0",
            WaveformKind::Custom => "A f(t)",
        }
    }

    /// What the harmonic content looks like.
    pub fn description(self) -> &'static str {
        match self {
            WaveformKind::Square => "odd harmonics only, decaying as 1/k",
            WaveformKind::Triangle => "odd harmonics only, decaying as 1/k^2",
            WaveformKind::Sawtooth => "all harmonics, decaying as 1/k",
            WaveformKind::HalfWaveRectified => "DC component plus even harmonics and the fundamental",
            WaveformKind::PulseTrain => "sinc-shaped envelope set by the duty cycle",
            WaveformKind::Custom => "user-supplied expression in t",
        }
    }
}

impl fmt::Display for WaveformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaveformKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "square" => Ok(WaveformKind::Square),
            "triangle" => Ok(WaveformKind::Triangle),
            "sawtooth" | "saw" => Ok(WaveformKind::Sawtooth),
            "half_wave" | "half_wave_rectified" => Ok(WaveformKind::HalfWaveRectified),
            "pulse_train" | "pulse" => Ok(WaveformKind::PulseTrain),
            "custom" => Ok(WaveformKind::Custom),
            other => Err(Error::InvalidParameter(format!(
                "unknown waveform '{}'",
                other
            ))),
        }
    }
}

/// Kind-specific parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraParams {
    /// Fraction of the period a pulse train is high, in `(0, 1)`.
    pub duty_cycle: Option<f64>,
    /// Expression text for [`WaveformKind::Custom`].
    pub expression: Option<String>,
}

impl ExtraParams {
    pub fn with_duty_cycle(duty_cycle: f64) -> Self {
        Self {
            duty_cycle: Some(duty_cycle),
            expression: None,
        }
    }

    pub fn with_expression(expression: impl Into<String>) -> Self {
        Self {
            duty_cycle: None,
            expression: Some(expression.into()),
        }
    }
}

/// A validated waveform shape with unit amplitude.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Waveform {
    Square,
    Triangle,
    Sawtooth,
    HalfWaveRectified,
    PulseTrain { duty_cycle: f64 },
    Custom(Expression),
}

impl Waveform {
    /// Build the shape for `kind`, checking kind-specific parameters.
    pub fn new(kind: WaveformKind, extra: &ExtraParams) -> Result<Self> {
        match kind {
            WaveformKind::Square => Ok(Waveform::Square),
            WaveformKind::Triangle => Ok(Waveform::Triangle),
            WaveformKind::Sawtooth => Ok(Waveform::Sawtooth),
            WaveformKind::HalfWaveRectified => Ok(Waveform::HalfWaveRectified),
            WaveformKind::PulseTrain => {
                let duty_cycle = extra.duty_cycle.unwrap_or(DEFAULT_DUTY_CYCLE);
                if !(duty_cycle > 0.0 && duty_cycle < 1.0) {
                    return Err(Error::InvalidParameter(format!(
                        "duty cycle must be in (0, 1), got {}",
                        duty_cycle
                    )));
                }
                Ok(Waveform::PulseTrain { duty_cycle })
            }
            WaveformKind::Custom => {
                let text = extra.expression.as_deref().ok_or_else(|| {
                    Error::InvalidParameter("custom waveform requires an expression".to_string())
                })?;
                Ok(Waveform::Custom(Expression::parse(text)?))
            }
        }
    }

    pub fn kind(&self) -> WaveformKind {
        match self {
            Waveform::Square => WaveformKind::Square,
            Waveform::Triangle => WaveformKind::Triangle,
            Waveform::Sawtooth => WaveformKind::Sawtooth,
            Waveform::HalfWaveRectified => WaveformKind::HalfWaveRectified,
            Waveform::PulseTrain { .. } => WaveformKind::PulseTrain,
            Waveform::Custom(_) => WaveformKind::Custom,
        }
    }

    /// Unit-amplitude value at time `t` for a waveform of the given period.
    pub fn shape_at(&self, t: f64, period: f64) -> Result<f64> {
        let u = t.rem_euclid(period) / period;
        let value = match self {
            Waveform::Square => {
                if u < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 2.0 * (2.0 * (u - 0.5)).abs() - 1.0,
            Waveform::Sawtooth => 2.0 * u - 1.0,
            Waveform::HalfWaveRectified => (2.0 * PI * t / period).sin().max(0.0),
            Waveform::PulseTrain { duty_cycle } => {
                if u < *duty_cycle {
                    1.0
                } else {
                    0.0
                }
            }
            Waveform::Custom(expr) => expr.eval(t)?,
        };
        Ok(value)
    }
}

/// A fully specified signal: shape, period and amplitude.
///
/// The amplitude scales the waveform before any coefficient is computed,
/// for custom expressions as well as built-in shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    waveform: Waveform,
    period: f64,
    amplitude: f64,
}

impl Signal {
    /// Validate parameters and compile the waveform.
    pub fn new(
        kind: WaveformKind,
        period: f64,
        amplitude: f64,
        extra: &ExtraParams,
    ) -> Result<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "period must be positive and finite, got {}",
                period
            )));
        }
        if !(amplitude.is_finite() && amplitude > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "amplitude must be positive and finite, got {}",
                amplitude
            )));
        }
        let waveform = Waveform::new(kind, extra)?;
        Ok(Self {
            waveform,
            period,
            amplitude,
        })
    }

    /// Square wave with no extra parameters.
    pub fn square(period: f64, amplitude: f64) -> Result<Self> {
        Self::new(WaveformKind::Square, period, amplitude, &ExtraParams::default())
    }

    /// Pulse train with the given duty cycle.
    pub fn pulse_train(period: f64, amplitude: f64, duty_cycle: f64) -> Result<Self> {
        Self::new(
            WaveformKind::PulseTrain,
            period,
            amplitude,
            &ExtraParams::with_duty_cycle(duty_cycle),
        )
    }

    /// Custom expression in `t`.
    pub fn custom(expression: &str, period: f64, amplitude: f64) -> Result<Self> {
        Self::new(
            WaveformKind::Custom,
            period,
            amplitude,
            &ExtraParams::with_expression(expression),
        )
    }

    pub fn kind(&self) -> WaveformKind {
        self.waveform.kind()
    }

    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Value at a single time.
    pub fn value_at(&self, t: f64) -> Result<f64> {
        Ok(self.amplitude * self.waveform.shape_at(t, self.period)?)
    }

    /// Values at every time in `times`.
    pub fn sample(&self, times: &[f64]) -> Result<Vec<f64>> {
        times.iter().map(|&t| self.value_at(t)).collect()
    }
}

impl PeriodicFunction for Signal {
    fn evaluate(&self, times: &[f64]) -> Result<Vec<f64>> {
        self.sample(times)
    }

    fn cache_key(&self) -> Option<FunctionKey> {
        let key = match &self.waveform {
            Waveform::Custom(expr) => FunctionKey::Expression {
                text: expr.source().to_string(),
                amplitude_bits: self.amplitude.to_bits(),
            },
            other => FunctionKey::Waveform {
                kind: other.kind(),
                period_bits: self.period.to_bits(),
                amplitude_bits: self.amplitude.to_bits(),
                duty_bits: match other {
                    Waveform::PulseTrain { duty_cycle } => Some(duty_cycle.to_bits()),
                    _ => None,
                },
            },
        };
        Some(key)
    }

    fn describe(&self) -> String {
        match &self.waveform {
            Waveform::Custom(expr) => format!("custom '{}' (A={})", expr, self.amplitude),
            other => format!(
                "{} (T={}, A={})",
                other.kind(),
                self.period,
                self.amplitude
            ),
        }
    }
}

/// Sample a waveform of the chosen family over `time_grid`.
///
/// The grid must be finite and non-decreasing. Failures in a custom
/// expression are returned to the caller; no fallback function is
/// substituted.
pub fn generate(
    kind: WaveformKind,
    period: f64,
    amplitude: f64,
    time_grid: &[f64],
    extra: &ExtraParams,
) -> Result<Vec<f64>> {
    validate_time_grid(time_grid)?;
    let signal = Signal::new(kind, period, amplitude, extra)?;
    signal.sample(time_grid)
}
