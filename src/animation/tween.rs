use std::collections::VecDeque;

use crate::{
    animation::ease::Ease,
    foundation::error::{HuploError, HuploResult},
};

/// A numeric attribute an [`Animation`] can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Attr {
    X,
    Y,
}

/// Entity whose attributes are driven by an animation chain.
pub trait Animatable {
    fn attr(&self, attr: Attr) -> f64;
    fn set_attr(&mut self, attr: Attr, value: f64);
    /// Invoked when a removal step of the chain fires.
    fn detach(&mut self);
}

trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Track {
    attr: Attr,
    from: Option<f64>, // captured on first advance
    to: f64,
}

#[derive(Clone, Debug, PartialEq)]
struct Tween {
    tracks: Vec<Track>,
    duration_s: f64,
    elapsed_s: f64,
    ease: Ease,
}

impl Tween {
    fn is_instant(&self) -> bool {
        !(self.duration_s.is_finite() && self.duration_s > 0.0)
    }

    /// Returns true once the tween has reached its end values.
    fn advance<T: Animatable + ?Sized>(&mut self, target: &mut T, dt_s: f64) -> bool {
        for track in &mut self.tracks {
            if track.from.is_none() {
                track.from = Some(target.attr(track.attr));
            }
        }

        self.elapsed_s += dt_s;
        let t = if self.is_instant() {
            1.0
        } else {
            (self.elapsed_s / self.duration_s).min(1.0)
        };

        let done = t >= 1.0;
        let te = self.ease.apply(t);
        for track in &self.tracks {
            let from = track.from.unwrap_or(track.to);
            let value = if done {
                track.to
            } else {
                f64::lerp(&from, &track.to, te)
            };
            target.set_attr(track.attr, value);
        }
        done
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Step {
    Tween(Tween),
    Detach,
}

/// One step of an [`Animation`] chain.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    step: Step,
    label: Option<&'static str>,
}

impl Link {
    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    fn is_instant(&self) -> bool {
        match &self.step {
            Step::Tween(tw) => tw.is_instant(),
            Step::Detach => true,
        }
    }
}

/// A `then`-composed animation chain; the front link is the one in control.
///
/// Only the front link advances. When it completes, [`Animation::update`] hands back the
/// rest of the chain, so callers replace their stored chain with whatever `update` returns.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    links: VecDeque<Link>, // never empty
}

/// Result of advancing a chain by one frame.
#[derive(Debug)]
pub enum Advance {
    Running(Animation),
    Finished,
}

impl Advance {
    pub fn into_option(self) -> Option<Animation> {
        match self {
            Self::Running(anim) => Some(anim),
            Self::Finished => None,
        }
    }
}

impl Animation {
    /// Interpolate each listed attribute from its value at the moment this link starts
    /// running to the given absolute target.
    ///
    /// A zero duration applies the targets on the first advance.
    pub fn to(attrs: &[(Attr, f64)], duration_s: f64, ease: Ease) -> Self {
        let tracks = attrs
            .iter()
            .map(|&(attr, to)| Track {
                attr,
                from: None,
                to,
            })
            .collect();
        Self::from_step(Step::Tween(Tween {
            tracks,
            duration_s,
            elapsed_s: 0.0,
            ease,
        }))
    }

    /// Like [`Animation::to`], but each target is `current + delta` where `current` is read
    /// from `target` now, when the link is built, not when it starts running.
    ///
    /// An axis with a zero delta is left uncontrolled rather than pinned to its value at
    /// construction, so it stays free for other links to move.
    pub fn to_relative<T: Animatable + ?Sized>(
        target: &T,
        dx: f64,
        dy: f64,
        duration_s: f64,
        ease: Ease,
    ) -> Self {
        let mut attrs = Vec::with_capacity(2);
        if dx != 0.0 {
            attrs.push((Attr::X, target.attr(Attr::X) + dx));
        }
        if dy != 0.0 {
            attrs.push((Attr::Y, target.attr(Attr::Y) + dy));
        }
        Self::to(&attrs, duration_s, ease)
    }

    /// Zero-duration terminal step that detaches its target from its owner.
    pub fn detach() -> Self {
        Self::from_step(Step::Detach)
    }

    fn from_step(step: Step) -> Self {
        Self {
            links: VecDeque::from([Link { step, label: None }]),
        }
    }

    /// Label the front link.
    pub fn with_label(mut self, label: &'static str) -> Self {
        if let Some(head) = self.links.front_mut() {
            head.label = Some(label);
        }
        self
    }

    /// Label of the link currently in control.
    pub fn label(&self) -> Option<&'static str> {
        self.links.front().and_then(Link::label)
    }

    /// Append `next` at the tail of this chain and return the head.
    pub fn then(mut self, next: Animation) -> Self {
        self.append(next);
        self
    }

    /// In-place form of [`Animation::then`].
    pub fn append(&mut self, next: Animation) {
        self.links.extend(next.links);
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    /// Seconds left before the whole chain completes.
    pub fn remaining_s(&self) -> f64 {
        self.links
            .iter()
            .map(|link| match &link.step {
                Step::Tween(tw) if !tw.is_instant() => (tw.duration_s - tw.elapsed_s).max(0.0),
                _ => 0.0,
            })
            .sum()
    }

    pub fn validate(&self) -> HuploResult<()> {
        for link in &self.links {
            let Step::Tween(tw) = &link.step else {
                continue;
            };
            if !tw.duration_s.is_finite() || tw.duration_s < 0.0 {
                return Err(HuploError::animation(
                    "animation duration must be finite and >= 0",
                ));
            }
            if tw.tracks.iter().any(|t| !t.to.is_finite()) {
                return Err(HuploError::animation("animation targets must be finite"));
            }
        }
        Ok(())
    }

    /// Advance the front link by `dt_s` and apply its eased values to `target`.
    ///
    /// Returns the chain while its front link runs, the remaining links once it completes,
    /// or [`Advance::Finished`] when nothing is left. Zero-duration successors (removal
    /// steps included) run inside the same call.
    pub fn update<T: Animatable + ?Sized>(mut self, target: &mut T, dt_s: f64) -> Advance {
        let mut dt_s = if dt_s.is_finite() { dt_s.max(0.0) } else { 0.0 };

        loop {
            let Some(head) = self.links.front_mut() else {
                return Advance::Finished;
            };
            let done = match &mut head.step {
                Step::Tween(tw) => tw.advance(target, dt_s),
                Step::Detach => {
                    target.detach();
                    true
                }
            };
            if !done {
                return Advance::Running(self);
            }

            self.links.pop_front();
            match self.links.front() {
                None => return Advance::Finished,
                Some(next) if !next.is_instant() => return Advance::Running(self),
                Some(_) => dt_s = 0.0,
            }
        }
    }
}

/// Advance an optional chain; `None` stays `None`.
pub fn advance_chain<T: Animatable + ?Sized>(
    chain: Option<Animation>,
    target: &mut T,
    dt_s: f64,
) -> Option<Animation> {
    chain.and_then(|anim| anim.update(target, dt_s).into_option())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
