//! Hot-tracking animation for the scrollbar hit zones.
//!
//! Each zone carries a scalar in `0.0..=1.0` that moves towards 1.0 while
//! the pointer is over the zone and back to 0.0 when it leaves. The host
//! drives the motion by calling [`HotZones::tick`] from its frame loop.

/// The six independently animated parts of the two scrollbars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitZone {
    HorizontalLeft,
    HorizontalRight,
    HorizontalThumb,
    VerticalUp,
    VerticalDown,
    VerticalThumb,
}

impl HitZone {
    pub const ALL: [HitZone; 6] = [
        HitZone::HorizontalLeft,
        HitZone::HorizontalRight,
        HitZone::HorizontalThumb,
        HitZone::VerticalUp,
        HitZone::VerticalDown,
        HitZone::VerticalThumb,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Animation phase of one zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZonePhase {
    Cold,
    Transitioning { from: f32, to: f32, elapsed: f32 },
    Hot,
}

impl ZonePhase {
    fn fraction(self, duration: f32) -> f32 {
        match self {
            ZonePhase::Cold => 0.0,
            ZonePhase::Hot => 1.0,
            ZonePhase::Transitioning { from, to, elapsed } => {
                let t = if duration > 0.0 {
                    (elapsed / duration).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                from + (to - from) * t
            }
        }
    }

    fn settled(hot: bool) -> Self {
        if hot {
            ZonePhase::Hot
        } else {
            ZonePhase::Cold
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ZoneState {
    hot: bool,
    phase: ZonePhase,
}

impl Default for ZoneState {
    fn default() -> Self {
        Self {
            hot: false,
            phase: ZonePhase::Cold,
        }
    }
}

/// Hot flags and animation phases for all six zones.
#[derive(Debug, Clone)]
pub struct HotZones {
    zones: [ZoneState; 6],
    duration: f32,
    animate: bool,
}

impl HotZones {
    /// `animate == false` makes every transition snap to its target.
    pub fn new(duration: f32, animate: bool) -> Self {
        Self {
            zones: [ZoneState::default(); 6],
            duration,
            animate,
        }
    }

    /// Records the zone's current hot flag and starts a transition when it
    /// changed. Returns whether the flag changed.
    ///
    /// A transition that is still running is superseded by the new one,
    /// which starts from the current fraction.
    pub fn set_hot(&mut self, zone: HitZone, hot: bool) -> bool {
        let duration = self.duration;
        let animate = self.animate && duration > 0.0;
        let state = &mut self.zones[zone.index()];
        if state.hot == hot {
            return false;
        }
        state.hot = hot;
        state.phase = if animate {
            ZonePhase::Transitioning {
                from: state.phase.fraction(duration),
                to: if hot { 1.0 } else { 0.0 },
                elapsed: 0.0,
            }
        } else {
            ZonePhase::settled(hot)
        };
        true
    }

    /// Whether the pointer is currently over `zone`.
    pub fn is_hot(&self, zone: HitZone) -> bool {
        self.zones[zone.index()].hot
    }

    /// Current fade phase of `zone`.
    pub fn phase(&self, zone: HitZone) -> ZonePhase {
        self.zones[zone.index()].phase
    }

    /// Current hot fraction, 0.0 = cold, 1.0 = hot.
    pub fn fraction(&self, zone: HitZone) -> f32 {
        self.zones[zone.index()].phase.fraction(self.duration)
    }

    /// Advances every running transition by `dt` seconds.
    ///
    /// Returns `true` while any zone is still transitioning.
    pub fn tick(&mut self, dt: f32) -> bool {
        let mut running = false;
        for state in &mut self.zones {
            if let ZonePhase::Transitioning { from, to, elapsed } = state.phase {
                let elapsed = elapsed + dt.max(0.0);
                if elapsed >= self.duration {
                    state.phase = ZonePhase::settled(to >= 1.0);
                } else {
                    state.phase = ZonePhase::Transitioning { from, to, elapsed };
                    running = true;
                }
            }
        }
        running
    }

    /// True while any zone is still fading in or out.
    pub fn is_animating(&self) -> bool {
        self.zones
            .iter()
            .any(|s| matches!(s.phase, ZonePhase::Transitioning { .. }))
    }
}
