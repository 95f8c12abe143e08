//! Progress reporting pool
//!
//! A pool of independently addressable progress bars, one per pipeline
//! stage. Each bar is one of two renderers chosen once at startup: an
//! interactive indicatif bar when stdout is a terminal, or a textual
//! fallback that overwrites a single line and derives its own rate, for
//! piped or redirected output. Log lines go through bar 0 so they never
//! tear an active bar.

use std::io::Write as _;
use std::time::{Duration, Instant};

use console::{Style, Term};
use indicatif::ProgressStyle;

use crate::error::{Result, SyncError};

/// Minimum delay between fallback line redraws
const FALLBACK_REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Width of the fallback bar column
const FALLBACK_BAR_WIDTH: usize = 30;

/// Options for one bar; unset fields fall back to the pool's global options,
/// then to built-in defaults
#[derive(Debug, Clone, Default)]
pub struct BarOptions {
    pub desc: Option<String>,
    pub total: Option<u64>,
    pub initial: Option<u64>,
    pub unit: Option<String>,
}

impl BarOptions {
    /// Overlay these options on top of the globals; set fields win
    fn merged_over(&self, global: &BarOptions) -> BarOptions {
        BarOptions {
            desc: self.desc.clone().or_else(|| global.desc.clone()),
            total: self.total.or(global.total),
            initial: self.initial.or(global.initial),
            unit: self.unit.clone().or_else(|| global.unit.clone()),
        }
    }

    /// Fill in built-in defaults for anything still unset
    fn resolve(self, index: usize) -> BarConfig {
        BarConfig {
            desc: self.desc.unwrap_or_else(|| format!("pbar {index}")),
            total: self.total.unwrap_or(100),
            initial: self.initial.unwrap_or(0),
            unit: self.unit.unwrap_or_else(|| "it".to_string()),
        }
    }
}

/// Fully resolved per-bar configuration
#[derive(Debug, Clone)]
pub struct BarConfig {
    pub desc: String,
    pub total: u64,
    pub initial: u64,
    pub unit: String,
}

/// One progress bar, rendered interactively or through the fallback
pub enum ProgressBar {
    Interactive(InteractiveBar),
    Fallback(FallbackBar),
}

impl ProgressBar {
    /// Advance the bar by `amount` units
    pub fn update(&mut self, amount: u64) {
        match self {
            ProgressBar::Interactive(bar) => bar.pb.inc(amount),
            ProgressBar::Fallback(bar) => bar.update(amount),
        }
    }

    /// Print a message without tearing the bar line
    pub fn write(&self, message: &str) {
        match self {
            ProgressBar::Interactive(bar) => bar.pb.println(message),
            ProgressBar::Fallback(bar) => bar.write(message),
        }
    }

    /// Return the bar to its initial value and restart rate accounting
    pub fn reset(&mut self) {
        match self {
            ProgressBar::Interactive(bar) => {
                bar.pb.reset();
                bar.pb.set_position(bar.initial);
            }
            ProgressBar::Fallback(bar) => bar.reset(),
        }
    }

    /// Change the bar's total
    pub fn set_total(&mut self, total: u64) {
        match self {
            ProgressBar::Interactive(bar) => bar.pb.set_length(total),
            ProgressBar::Fallback(bar) => bar.set_total(total),
        }
    }

    /// Change the bar's description
    pub fn set_message(&mut self, message: &str) {
        match self {
            ProgressBar::Interactive(bar) => bar.pb.set_message(message.to_string()),
            ProgressBar::Fallback(bar) => bar.desc = message.to_string(),
        }
    }

    /// Current value of the bar
    pub fn position(&self) -> u64 {
        match self {
            ProgressBar::Interactive(bar) => bar.pb.position(),
            ProgressBar::Fallback(bar) => bar.current,
        }
    }
}

/// Real-time terminal bar backed by indicatif
pub struct InteractiveBar {
    pb: indicatif::ProgressBar,
    initial: u64,
}

impl InteractiveBar {
    fn new(config: BarConfig) -> Self {
        let style = ProgressStyle::default_bar()
            .template("{msg} [{bar:30.cyan/blue}] {pos}/{len} ({per_sec}, {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        let pb = indicatif::ProgressBar::new(config.total);
        pb.set_style(style);
        pb.set_message(config.desc);
        pb.set_position(config.initial);
        Self {
            pb,
            initial: config.initial,
        }
    }
}

/// Textual renderer for non-interactive output
///
/// Keeps its own state and derives the instantaneous rate from the two most
/// recent updates. Time is passed in explicitly by the `_at` methods so the
/// clock can be driven in tests; the public methods use `Instant::now()`.
pub struct FallbackBar {
    desc: String,
    unit: String,
    total: u64,
    initial: u64,
    current: u64,
    last_instant: Option<Instant>,
    last_rate: f64,
    last_draw: Option<Instant>,
}

impl FallbackBar {
    fn new(config: BarConfig) -> Self {
        Self {
            desc: config.desc,
            unit: config.unit,
            total: config.total,
            initial: config.initial,
            current: config.initial,
            last_instant: None,
            last_rate: 0.0,
            last_draw: None,
        }
    }

    fn update(&mut self, amount: u64) {
        self.update_at(amount, Instant::now());
    }

    /// Advance by `amount` as of `now`, clamping at the total
    pub fn update_at(&mut self, amount: u64, now: Instant) {
        let previous = self.current;
        self.current = (self.current + amount).min(self.total);
        self.last_rate = match self.last_instant {
            Some(prev_instant) => {
                let delta = now.saturating_duration_since(prev_instant).as_secs_f64();
                if delta == 0.0 {
                    0.0
                } else {
                    (self.current - previous) as f64 / delta
                }
            }
            None => 0.0,
        };
        self.last_instant = Some(now);
        self.draw(now);
    }

    fn reset(&mut self) {
        self.current = self.initial;
        self.last_instant = None;
        self.last_rate = 0.0;
        self.last_draw = None;
    }

    fn set_total(&mut self, total: u64) {
        self.total = total;
        self.current = self.current.min(total);
    }

    fn write(&self, message: &str) {
        println!("{}", overwrite(message));
        let _ = std::io::stdout().flush();
    }

    /// Rate derived from the two most recent updates, in units per second
    pub fn rate(&self) -> f64 {
        self.last_rate
    }

    /// Current clamped value
    pub fn current(&self) -> u64 {
        self.current
    }

    fn draw(&mut self, now: Instant) {
        let due = match self.last_draw {
            Some(last) => {
                now.saturating_duration_since(last) >= FALLBACK_REDRAW_INTERVAL
                    || self.current == self.total
            }
            None => true,
        };
        if !due {
            return;
        }
        self.last_draw = Some(now);

        let filled = if self.total == 0 {
            0
        } else {
            (self.current as usize * FALLBACK_BAR_WIDTH) / self.total as usize
        };
        let bar: String = "#".repeat(filled) + &" ".repeat(FALLBACK_BAR_WIDTH - filled);
        let line = format!(
            "{} |{}| {}/{}{} [{:.2} {}/s]",
            self.desc, bar, self.current, self.total, self.unit, self.last_rate, self.unit
        );
        print!("{}", overwrite(&line));
        let _ = std::io::stdout().flush();
    }
}

/// Prefix a line so it replaces whatever is currently on the terminal line:
/// return to column 0 and erase to end of line, so a shorter line leaves no
/// residue from a longer previous one
fn overwrite(message: &str) -> String {
    format!("\r\x1b[K{message}")
}

/// Pool of progress bars, one per pipeline stage
pub struct ProgressPool {
    bars: Vec<ProgressBar>,
}

impl ProgressPool {
    /// Build a pool of `count` bars. `individual` must hold exactly one
    /// option set per bar; each is overlaid on `global`.
    pub fn new(
        count: usize,
        interactive: bool,
        global: BarOptions,
        individual: Vec<BarOptions>,
    ) -> Result<Self> {
        if individual.len() != count {
            return Err(SyncError::BarCountMismatch {
                bars: count,
                options: individual.len(),
            });
        }
        let bars = individual
            .into_iter()
            .enumerate()
            .map(|(i, options)| {
                let config = options.merged_over(&global).resolve(i);
                if interactive {
                    ProgressBar::Interactive(InteractiveBar::new(config))
                } else {
                    ProgressBar::Fallback(FallbackBar::new(config))
                }
            })
            .collect();
        Ok(Self { bars })
    }

    /// Build a pool, picking the renderer from whether stdout is a terminal
    pub fn for_stdout(
        count: usize,
        global: BarOptions,
        individual: Vec<BarOptions>,
    ) -> Result<Self> {
        Self::new(count, Term::stdout().is_term(), global, individual)
    }

    /// Write a message through bar 0
    pub fn write(&self, message: &str) {
        if let Some(bar) = self.bars.first() {
            bar.write(message);
        }
    }

    /// Access one bar by index
    pub fn bar(&mut self, index: usize) -> &mut ProgressBar {
        &mut self.bars[index]
    }

    /// Number of bars in the pool
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the pool has no bars
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

fn levelled(style: &Style, label: &str, message: &str) -> String {
    // Pad before styling so the ANSI codes do not skew the column
    format!("{}{}", style.apply_to(format!("{label:<12}")), message)
}

/// An INFO-levelled log line
pub fn info(message: &str) -> String {
    levelled(&Style::new().cyan(), "INFO:", message)
}

/// A WARNING-levelled log line
pub fn warning(message: &str) -> String {
    levelled(&Style::new().yellow(), "WARNING:", message)
}

/// An ERROR-levelled log line
pub fn error(message: &str) -> String {
    levelled(&Style::new().red(), "ERROR:", message)
}
