//! Hover focus and the colour transitions it drives.
//!
//! | state          | hit          | effect                                           |
//! |----------------|--------------|--------------------------------------------------|
//! | `Idle`         | `Some(h)`    | `h` steps toward hover, becomes focus            |
//! | `Hovering(i)`  | `Some(i)`    | `i` steps toward hover                           |
//! | `Hovering(i)`  | `Some(h≠i)`  | `i` steps toward rest and fades out, `h` focus   |
//! | `Hovering(i)`  | `None`       | `i` steps toward rest, `Idle` once it arrives    |
//! | `Idle`         | `None`       | nothing                                          |

use bevy::prelude::*;

use crate::engine::cloud::colour::{ColourBuffer, CranePalette};
use crate::engine::cloud::sampler::FeaturedSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(usize),
}

/// What one `advance` call did, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverStep {
    pub toward_hover: Option<usize>,
    pub toward_rest: Option<usize>,
    /// Focus dropped back to `Idle` this frame after this index settled.
    pub released: Option<usize>,
}

/// Borrowed colour state a hover step writes through.
pub struct ColourTargets<'a> {
    pub colours: &'a mut ColourBuffer,
    pub featured: &'a FeaturedSet,
    pub palette: &'a CranePalette,
    pub rate: f32,
}

impl ColourTargets<'_> {
    fn toward_rest(&mut self, index: usize) -> bool {
        let resting = self.palette.resting_for(index, self.featured);
        self.colours.step(index, resting, self.rate)
    }

    fn toward_hover(&mut self, index: usize) -> bool {
        self.colours.step(index, self.palette.hover, self.rate)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct HoverMachine {
    state: HoverState,
    /// Cranes that lost focus to another crane and are still fading back.
    fading: Vec<usize>,
}

impl HoverMachine {
    pub fn state(&self) -> HoverState {
        self.state
    }

    pub fn hovered(&self) -> Option<usize> {
        match self.state {
            HoverState::Idle => None,
            HoverState::Hovering(index) => Some(index),
        }
    }

    pub fn fading(&self) -> &[usize] {
        &self.fading
    }

    /// Apply one frame's hit test result. Performs at most two colour steps.
    pub fn advance(&mut self, hit: Option<usize>, targets: &mut ColourTargets) -> HoverStep {
        let mut step = HoverStep::default();

        match (self.state, hit) {
            (HoverState::Hovering(previous), Some(index)) if previous != index => {
                step.toward_rest = Some(previous);
                if !targets.toward_rest(previous) && !self.fading.contains(&previous) {
                    self.fading.push(previous);
                }
                self.focus(index, targets, &mut step);
            }
            (_, Some(index)) => self.focus(index, targets, &mut step),
            (HoverState::Hovering(index), None) => {
                step.toward_rest = Some(index);
                if targets.toward_rest(index) {
                    self.state = HoverState::Idle;
                    step.released = Some(index);
                }
            }
            (HoverState::Idle, None) => {}
        }

        step
    }

    fn focus(&mut self, index: usize, targets: &mut ColourTargets, step: &mut HoverStep) {
        self.fading.retain(|&fading| fading != index);
        targets.toward_hover(index);
        step.toward_hover = Some(index);
        self.state = HoverState::Hovering(index);
    }

    /// Step every fading crane toward rest and drop the ones that arrived.
    ///
    /// Runs before `advance` each frame so a crane released this frame is not
    /// stepped twice. This frame's hit leaves the fading list unstepped, since
    /// `advance` moves it toward hover instead. Returns how many are still fading.
    pub fn settle_fading(&mut self, hit: Option<usize>, targets: &mut ColourTargets) -> usize {
        if let Some(index) = hit {
            self.fading.retain(|&fading| fading != index);
        }
        self.fading.retain(|&index| !targets.toward_rest(index));
        self.fading.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Harness {
        machine: HoverMachine,
        colours: ColourBuffer,
        featured: FeaturedSet,
        palette: CranePalette,
    }

    impl Harness {
        fn new(amount: usize, featured_count: usize) -> Self {
            let featured = FeaturedSet::first(featured_count, amount);
            let palette = CranePalette::default();
            Self {
                machine: HoverMachine::default(),
                colours: ColourBuffer::from_resting(amount, &featured, &palette),
                featured,
                palette,
            }
        }

        fn frame(&mut self, hit: Option<usize>) -> HoverStep {
            let mut targets = ColourTargets {
                colours: &mut self.colours,
                featured: &self.featured,
                palette: &self.palette,
                rate: 0.1,
            };
            self.machine.settle_fading(hit, &mut targets);
            self.machine.advance(hit, &mut targets)
        }
    }

    fn step(hover: Option<usize>, rest: Option<usize>, released: Option<usize>) -> HoverStep {
        HoverStep {
            toward_hover: hover,
            toward_rest: rest,
            released,
        }
    }

    #[test]
    fn scripted_sequence_follows_transition_table() {
        let mut harness = Harness::new(10, 3);
        let script = [Some(5), Some(5), None, None, Some(7)];
        let steps: Vec<HoverStep> = script.iter().map(|hit| harness.frame(*hit)).collect();

        assert_eq!(
            steps,
            vec![
                step(Some(5), None, None),
                step(Some(5), None, None),
                step(None, Some(5), None),
                step(None, Some(5), None),
                step(Some(7), Some(5), None),
            ]
        );
        assert_eq!(harness.machine.state(), HoverState::Hovering(7));
        assert_eq!(harness.machine.fading(), &[5]);
    }

    #[test]
    fn release_waits_for_convergence() {
        let mut harness = Harness::new(10, 3);
        for _ in 0..20 {
            harness.frame(Some(4));
        }

        let mut frames = 0;
        loop {
            frames += 1;
            let step = harness.frame(None);
            assert_eq!(step.toward_rest, Some(4));
            if step.released.is_some() {
                break;
            }
            assert_eq!(harness.machine.state(), HoverState::Hovering(4));
            assert!(frames < 60);
        }

        assert_eq!(harness.machine.state(), HoverState::Idle);
        assert_eq!(harness.machine.hovered(), None);
        assert_eq!(harness.frame(None), HoverStep::default());
    }

    #[test]
    fn idle_without_hit_touches_nothing() {
        let mut harness = Harness::new(4, 1);
        harness.colours.take_dirty();

        assert_eq!(harness.frame(None), HoverStep::default());
        assert!(!harness.colours.take_dirty());
    }

    #[test]
    fn faded_crane_returns_to_its_resting_colour() {
        let mut harness = Harness::new(10, 3);
        for _ in 0..30 {
            harness.frame(Some(1));
        }
        harness.frame(Some(8));
        assert_eq!(harness.machine.fading(), &[1]);

        for _ in 0..60 {
            harness.frame(Some(8));
        }

        assert!(harness.machine.fading().is_empty());
        let colour = harness.colours.get(1).unwrap();
        assert!((colour.red - harness.palette.featured.red).abs() < 0.01);
        assert!((colour.green - harness.palette.featured.green).abs() < 0.01);
        assert!((colour.blue - harness.palette.featured.blue).abs() < 0.01);
    }

    #[test]
    fn refocusing_a_fading_crane_stops_its_fade() {
        let mut harness = Harness::new(10, 0);
        for _ in 0..10 {
            harness.frame(Some(2));
        }
        harness.frame(Some(3));
        assert_eq!(harness.machine.fading(), &[2]);

        let step = harness.frame(Some(2));
        assert_eq!(step, self::step(Some(2), Some(3), None));
        assert_eq!(harness.machine.fading(), &[3]);
    }

    #[test]
    fn refocused_crane_only_steps_toward_hover() {
        let mut harness = Harness::new(10, 0);
        for _ in 0..10 {
            harness.frame(Some(2));
        }
        harness.frame(Some(3));
        let before = harness.colours.get(2).unwrap();

        harness.frame(Some(2));

        let hover = harness.palette.hover;
        let after = harness.colours.get(2).unwrap();
        approx::assert_relative_eq!(after.red, before.red + (hover.red - before.red) * 0.1, epsilon = 1e-6);
        approx::assert_relative_eq!(after.green, before.green + (hover.green - before.green) * 0.1, epsilon = 1e-6);
        approx::assert_relative_eq!(after.blue, before.blue + (hover.blue - before.blue) * 0.1, epsilon = 1e-6);
    }

    #[test]
    fn only_one_crane_moves_toward_hover() {
        let mut harness = Harness::new(10, 0);
        let script = [Some(1), Some(2), Some(3), None, Some(1), Some(1)];
        for hit in script {
            let step = harness.frame(hit);
            assert_eq!(step.toward_hover, hit);
            assert!(step.toward_rest != step.toward_hover || step.toward_rest.is_none());
        }
    }
}
