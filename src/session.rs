//! Session lifecycle
//!
//! [`Session`] is what a host drives: it owns the [`World`], turns wall-clock
//! time into fixed 60 Hz frames, feeds normalized input in, and hands the
//! frame's events and draw list to the host's collaborators.

use crate::audio::CuePlayer;
use crate::consts::*;
use crate::input::InputState;
use crate::render::{DrawList, RenderAdapter};
use crate::roster::RosterData;
use crate::settings::Settings;
use crate::sim::{ControlSignal, EndReason, SimEvent, World, tick};

/// Score display and end-of-session hooks
pub trait SessionObserver {
    fn score_changed(&mut self, _score: u64) {}
    /// Called once per session
    fn session_ended(&mut self, _final_score: u64, _reason: EndReason) {}
}

impl SessionObserver for () {}

/// Host-side collaborators for one callback
pub struct Collaborators<'a> {
    pub cues: &'a mut dyn CuePlayer,
    pub observer: &'a mut dyn SessionObserver,
    pub renderer: &'a mut dyn RenderAdapter,
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

/// Longest wall-clock gap accepted per callback (seconds)
const MAX_ELAPSED: f32 = 0.1;

impl FrameClock {
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Add elapsed wall time and return how many frames to simulate.
    /// Backlog past the per-callback cap is dropped.
    pub fn advance(&mut self, elapsed_secs: f32) -> u32 {
        let elapsed = if elapsed_secs.is_finite() {
            elapsed_secs.clamp(0.0, MAX_ELAPSED)
        } else {
            0.0
        };
        self.accumulator += elapsed;
        let mut frames = 0;
        while self.accumulator >= FRAME_DT && frames < MAX_FRAMES_PER_CALLBACK {
            self.accumulator -= FRAME_DT;
            frames += 1;
        }
        if frames == MAX_FRAMES_PER_CALLBACK && self.accumulator >= FRAME_DT {
            log::debug!("Dropping {:.3}s of frame backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        frames
    }
}

/// One host-facing game instance
pub struct Session {
    world: World,
    settings: Settings,
    input: InputState,
    clock: FrameClock,
    /// `session_ended` already forwarded for the current session
    end_reported: bool,
}

impl Session {
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self {
            world: World::new(seed),
            settings,
            input: InputState::new(),
            clock: FrameClock::default(),
            end_reported: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Device events go here between callbacks
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn is_running(&self) -> bool {
        self.world.is_running()
    }

    pub fn score(&self) -> u64 {
        self.world.score()
    }

    /// Start a fresh session on the current seed. Restarting this way
    /// replays the same level; use [`Session::start_session_with_seed`]
    /// for a new one.
    pub fn start_session(&mut self, roster: RosterData) {
        self.world.start_session(roster);
        self.input.reset();
        self.clock.reset();
        self.end_reported = false;
    }

    /// Start a fresh session on a new RNG stream
    pub fn start_session_with_seed(&mut self, roster: RosterData, seed: u64) {
        self.world.reseed(seed);
        self.start_session(roster);
    }

    /// Host callback: simulate the elapsed time, dispatch events and draw.
    /// Returns whether the host should keep scheduling callbacks.
    pub fn advance(&mut self, elapsed_secs: f32, collab: &mut Collaborators<'_>) -> bool {
        let frames = self.clock.advance(elapsed_secs);
        for _ in 0..frames {
            if !self.world.is_running() {
                break;
            }
            let signal = self.control_signal();
            self.frame(&signal, collab);
        }
        collab
            .renderer
            .draw(&DrawList::capture(&self.world, &self.settings));
        self.world.is_running()
    }

    /// Simulate exactly one frame with an explicit signal
    pub fn frame(&mut self, signal: &ControlSignal, collab: &mut Collaborators<'_>) {
        tick(&mut self.world, signal);
        self.dispatch(collab);
    }

    /// End the running session from outside the simulation (e.g. the host
    /// is closing). No-op if it already ended.
    pub fn end_session(&mut self, reason: EndReason, collab: &mut Collaborators<'_>) {
        self.world.ledger.end_session(reason);
        self.dispatch(collab);
    }

    fn control_signal(&mut self) -> ControlSignal {
        let center_x = self
            .world
            .player
            .as_ref()
            .map_or(SCREEN_WIDTH / 2.0, |p| p.center().x);
        self.input.control(center_x, &self.settings)
    }

    /// Forward this frame's events to the collaborators
    fn dispatch(&mut self, collab: &mut Collaborators<'_>) {
        for event in self.world.drain_events() {
            match event {
                SimEvent::Cue(cue) => collab.cues.play(cue),
                SimEvent::ScoreChanged(score) => collab.observer.score_changed(score),
                SimEvent::SessionEnded {
                    final_score,
                    reason,
                } => {
                    if self.end_reported {
                        continue;
                    }
                    self.end_reported = true;
                    collab.observer.session_ended(final_score, reason);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Cue;
    use crate::input::Key;
    use crate::render::HeadlessRenderer;
    use crate::sim::{Obstacle, ObstacleKind};

    #[derive(Default)]
    struct Recorder {
        scores: Vec<u64>,
        ended: Vec<(u64, EndReason)>,
    }

    impl SessionObserver for Recorder {
        fn score_changed(&mut self, score: u64) {
            self.scores.push(score);
        }

        fn session_ended(&mut self, final_score: u64, reason: EndReason) {
            self.ended.push((final_score, reason));
        }
    }

    #[derive(Default)]
    struct Host {
        cues: Vec<Cue>,
        observer: Recorder,
        renderer: HeadlessRenderer,
    }

    impl Host {
        fn collab(&mut self) -> Collaborators<'_> {
            Collaborators {
                cues: &mut self.cues,
                observer: &mut self.observer,
                renderer: &mut self.renderer,
            }
        }
    }

    fn running(seed: u64) -> Session {
        let mut session = Session::new(seed, Settings::default());
        session.start_session(RosterData::demo());
        session
    }

    fn put_fatigue_on_player(session: &mut Session) {
        let world = session.world_mut();
        let pos = world.player.as_ref().unwrap().pos;
        world
            .obstacles
            .push(Obstacle::new(pos.x, pos.y, ObstacleKind::Fatigue));
    }

    #[test]
    fn test_frame_clock_accumulates() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(FRAME_DT * 0.5), 0);
        assert_eq!(clock.advance(FRAME_DT * 0.6), 1);
        assert_eq!(clock.advance(FRAME_DT * 2.0), 2);
    }

    #[test]
    fn test_frame_clock_caps_per_callback() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(1.0), MAX_FRAMES_PER_CALLBACK);
        assert_eq!(clock.advance(0.0), 0);
        assert_eq!(clock.advance(-5.0), 0);
    }

    #[test]
    fn test_frame_clock_ignores_bad_elapsed() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(f32::INFINITY), 0);
        assert_eq!(clock.advance(FRAME_DT * 1.5), 1);
        assert_eq!(clock.advance(FRAME_DT * 0.6), 1);
    }

    #[test]
    fn test_restart_replays_seed() {
        let mut first = running(12);
        let layout: Vec<_> = first.world().platforms.iter().map(|p| p.pos).collect();
        first.start_session(RosterData::demo());
        let replay: Vec<_> = first.world().platforms.iter().map(|p| p.pos).collect();
        assert_eq!(layout, replay);
    }

    #[test]
    fn test_advance_simulates_and_draws() {
        let mut session = running(3);
        let mut host = Host::default();
        assert!(session.advance(FRAME_DT * 3.5, &mut host.collab()));
        assert_eq!(session.world().time_frames, 3);
        assert_eq!(host.renderer.frames_drawn, 1);
    }

    #[test]
    fn test_idle_session_draws_but_does_not_run() {
        let mut session = Session::new(3, Settings::default());
        let mut host = Host::default();
        assert!(!session.advance(0.05, &mut host.collab()));
        assert_eq!(session.world().time_frames, 0);
        assert_eq!(host.renderer.frames_drawn, 1);
    }

    #[test]
    fn test_session_end_reported_once() {
        let mut session = running(5);
        let mut host = Host::default();
        put_fatigue_on_player(&mut session);

        assert!(!session.advance(FRAME_DT * 4.0, &mut host.collab()));
        assert_eq!(host.observer.ended, vec![(0, EndReason::Obstacle)]);
        assert_eq!(host.cues.last(), Some(&Cue::Hit));
        assert_eq!(session.world().time_frames, 1);

        // Further callbacks draw but neither tick nor notify
        assert!(!session.advance(FRAME_DT * 4.0, &mut host.collab()));
        session.end_session(EndReason::Fell, &mut host.collab());
        assert_eq!(host.observer.ended.len(), 1);
        assert_eq!(host.renderer.frames_drawn, 2);
    }

    #[test]
    fn test_end_session_twice_is_idempotent() {
        let mut session = running(6);
        let mut host = Host::default();
        session.world_mut().ledger.award(30);
        session.end_session(EndReason::Fell, &mut host.collab());
        session.end_session(EndReason::Projectile, &mut host.collab());

        assert_eq!(host.observer.ended, vec![(30, EndReason::Fell)]);
        assert_eq!(session.score(), 30);
        let hits = host.cues.iter().filter(|c| **c == Cue::Hit).count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_restart_reports_next_end() {
        let mut session = running(7);
        let mut host = Host::default();
        session.end_session(EndReason::Fell, &mut host.collab());
        session.start_session_with_seed(RosterData::default(), 8);
        assert!(session.is_running());
        assert_eq!(session.world().seed, 8);
        session.end_session(EndReason::Fell, &mut host.collab());
        assert_eq!(host.observer.ended.len(), 2);
    }

    #[test]
    fn test_scores_reported_in_order() {
        let mut session = running(9);
        let mut host = Host::default();
        session.world_mut().ledger.award(5);
        session.world_mut().ledger.propose_score(12);
        session.world_mut().ledger.propose_score(3);
        session.frame(&ControlSignal::default(), &mut host.collab());
        assert_eq!(&host.observer.scores[..2], &[5, 12]);
        assert!(host.observer.scores.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_held_fire_key_shoots() {
        let mut session = running(10);
        let mut host = Host::default();
        session.input_mut().key_down(Key::Fire);
        session.advance(FRAME_DT * 1.5, &mut host.collab());
        assert!(host.cues.contains(&Cue::Shoot));
        assert_eq!(session.world().player_bullets.len(), 1);
    }
}
