//! Background image and overlay crossfade.
//!
//! The displayed background is a pure function of the active palette and the
//! current location. When that function's output changes the image fades
//! out, waits `fade_delay`, swaps, and fades back in. Every change bumps a
//! generation counter; a timer only swaps if its generation is still current,
//! so only the latest pair is ever shown.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::catalog::Theme;

/// Default fade-out/fade-in delay.
pub const DEFAULT_FADE_DELAY: Duration = Duration::from_millis(300);
/// Default overlay opacity.
pub const DEFAULT_OVERLAY_ALPHA: f32 = 0.85;
/// Default overlay gradient direction.
pub const DEFAULT_GRADIENT_ANGLE_DEG: u16 = 135;
/// Image shown for locations without a dedicated asset.
pub const DEFAULT_IMAGE: &str = "/assets/black_rose_dark.png";

/// Location → image asset lookup with a generic fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundMap {
    images: BTreeMap<String, String>,
    default_image: String,
}

impl BackgroundMap {
    /// Empty map falling back to `default_image` everywhere.
    pub fn new(default_image: impl Into<String>) -> Self {
        Self {
            images: BTreeMap::new(),
            default_image: default_image.into(),
        }
    }

    /// Add or replace the asset for one location.
    pub fn with(mut self, location: impl Into<String>, image: impl Into<String>) -> Self {
        self.images.insert(location.into(), image.into());
        self
    }

    /// Asset for `location`, or the default asset.
    pub fn image_for(&self, location: &str) -> &str {
        self.images
            .get(location)
            .map(String::as_str)
            .unwrap_or(&self.default_image)
    }
}

impl Default for BackgroundMap {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE)
            .with("/", "/assets/black_rose_home.png")
            .with("/404", "/assets/black_rose_404.png")
    }
}

/// Overlay gradient parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub alpha: f32,
    pub angle_deg: u16,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_OVERLAY_ALPHA,
            angle_deg: DEFAULT_GRADIENT_ANGLE_DEG,
        }
    }
}

/// Everything the transition needs besides its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundSettings {
    pub images: BackgroundMap,
    pub overlay: OverlayStyle,
    pub fade_delay: Duration,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            images: BackgroundMap::default(),
            overlay: OverlayStyle::default(),
            fade_delay: DEFAULT_FADE_DELAY,
        }
    }
}

/// The `(image, overlay)` pair that is compared to decide on a crossfade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundFrame {
    pub image_source: String,
    pub overlay: String,
}

/// What the shell should draw right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundState {
    pub image_source: String,
    pub overlay: String,
    pub visible: bool,
}

/// Two-stop translucent gradient from the palette's first two colors.
///
/// A single-color palette uses its only color for both stops.
pub fn overlay_for(theme: &Theme, style: OverlayStyle) -> String {
    let Some(start) = theme.colors.first() else {
        return String::new();
    };
    let end = theme.colors.get(1).unwrap_or(start);
    format!(
        "linear-gradient({}deg, {}, {})",
        style.angle_deg,
        start.to_rgba(style.alpha),
        end.to_rgba(style.alpha)
    )
}

/// Pure mapping from `(theme, location)` to the frame to display.
pub fn compute_frame(
    theme: &Theme,
    location: &str,
    images: &BackgroundMap,
    style: OverlayStyle,
) -> BackgroundFrame {
    BackgroundFrame {
        image_source: images.image_for(location).to_string(),
        overlay: overlay_for(theme, style),
    }
}

#[derive(Debug)]
struct Shared {
    displayed: BackgroundFrame,
    visible: bool,
    generation: u64,
    pending: Option<PendingSwap>,
    swaps: u64,
}

/// Scheduled swap and the frame it will show.
#[derive(Debug)]
struct PendingSwap {
    frame: BackgroundFrame,
    timer: JoinHandle<()>,
}

impl Shared {
    fn snapshot(&self) -> BackgroundState {
        BackgroundState {
            image_source: self.displayed.image_source.clone(),
            overlay: self.displayed.overlay.clone(),
            visible: self.visible,
        }
    }
}

#[derive(Debug)]
struct TransitionCore {
    shared: Mutex<Shared>,
    state_tx: watch::Sender<BackgroundState>,
}

impl TransitionCore {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, shared: &Shared) {
        self.state_tx.send_replace(shared.snapshot());
    }

    fn finish_swap(&self, generation: u64, next: BackgroundFrame) {
        let mut shared = self.lock();
        if shared.generation != generation {
            debug!(generation, current = shared.generation, "dropping stale crossfade");
            return;
        }
        shared.displayed = next;
        shared.visible = true;
        shared.pending = None;
        shared.swaps += 1;
        debug!(generation, image = %shared.displayed.image_source, "crossfade swapped");
        self.publish(&shared);
    }
}

/// Crossfading background driven by palette and location changes.
#[derive(Debug)]
pub struct BackgroundTransition {
    settings: BackgroundSettings,
    core: Arc<TransitionCore>,
}

impl BackgroundTransition {
    /// Start fully visible on the frame for the initial inputs.
    pub fn new(theme: &Theme, location: &str, settings: BackgroundSettings) -> Self {
        let displayed = compute_frame(theme, location, &settings.images, settings.overlay);
        let shared = Shared {
            displayed,
            visible: true,
            generation: 0,
            pending: None,
            swaps: 0,
        };
        let (state_tx, _) = watch::channel(shared.snapshot());
        Self {
            settings,
            core: Arc::new(TransitionCore {
                shared: Mutex::new(shared),
                state_tx,
            }),
        }
    }

    /// Feed new inputs. Must run inside a tokio runtime.
    ///
    /// Repeating the frame already scheduled leaves its timer running. Any
    /// other input cancels the pending swap. If the new frame differs from the
    /// one on screen the background hides and a fresh swap is scheduled; if it
    /// matches, the background simply becomes visible again.
    pub fn update(&self, theme: &Theme, location: &str) {
        let next = compute_frame(
            theme,
            location,
            &self.settings.images,
            self.settings.overlay,
        );
        let mut shared = self.core.lock();
        if shared.pending.as_ref().is_some_and(|p| p.frame == next) {
            return;
        }
        shared.generation += 1;
        let generation = shared.generation;
        if let Some(pending) = shared.pending.take() {
            pending.timer.abort();
        }

        if next == shared.displayed {
            if !shared.visible {
                shared.visible = true;
                debug!(generation, "crossfade cancelled; frame unchanged");
                self.core.publish(&shared);
            }
            return;
        }

        shared.visible = false;
        self.core.publish(&shared);
        debug!(generation, image = %next.image_source, "crossfade scheduled");

        let core = Arc::clone(&self.core);
        let delay = self.settings.fade_delay;
        let frame = next.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            core.finish_swap(generation, next);
        });
        shared.pending = Some(PendingSwap { frame, timer });
    }

    /// Follow palette and location watches until either sender goes away.
    pub fn follow(
        self: &Arc<Self>,
        mut theme_rx: watch::Receiver<Theme>,
        mut location_rx: watch::Receiver<String>,
    ) -> JoinHandle<()> {
        let transition = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                let theme = theme_rx.borrow_and_update().clone();
                let location = location_rx.borrow_and_update().clone();
                transition.update(&theme, &location);

                tokio::select! {
                    changed = theme_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    changed = location_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        })
    }

    /// Current drawable state.
    pub fn state(&self) -> BackgroundState {
        self.core.lock().snapshot()
    }

    /// Watch drawable state changes.
    pub fn subscribe(&self) -> watch::Receiver<BackgroundState> {
        self.core.state_tx.subscribe()
    }

    /// Number of completed swaps since construction.
    pub fn swap_count(&self) -> u64 {
        self.core.lock().swaps
    }

    /// True while a swap is scheduled but not yet shown.
    pub fn is_pending(&self) -> bool {
        self.core.lock().pending.is_some()
    }
}

impl Drop for BackgroundTransition {
    fn drop(&mut self) {
        let mut shared = self.core.lock();
        shared.generation += 1;
        if let Some(pending) = shared.pending.take() {
            pending.timer.abort();
        }
    }
}
