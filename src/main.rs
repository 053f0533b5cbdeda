//! Roster Jump entry point
//!
//! The browser build is driven from `roster_jump::web`. Natively this runs a
//! headless session with a simple autopilot and prints how far it got.
//!
//! Usage: `roster-jump [seed] [roster.csv]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use roster_jump::audio::LogCues;
    use roster_jump::consts::FRAME_RATE;
    use roster_jump::render::{DrawList, HeadlessRenderer, RenderAdapter};
    use roster_jump::sim::{ControlSignal, EndReason, World};
    use roster_jump::{Collaborators, RosterData, Session, SessionObserver, Settings};

    /// Give up after this many simulated seconds
    const MAX_SECONDS: u32 = 600;

    #[derive(Default)]
    struct Summary {
        ended: Option<(u64, EndReason)>,
    }

    impl SessionObserver for Summary {
        fn score_changed(&mut self, score: u64) {
            log::debug!("Score: {}", score);
        }

        fn session_ended(&mut self, final_score: u64, reason: EndReason) {
            self.ended = Some((final_score, reason));
        }
    }

    /// Steer toward the next platform: the one below while falling, the
    /// lowest one above while rising. Fires every third of a second.
    fn autopilot(world: &World) -> ControlSignal {
        let Some(player) = &world.player else {
            return ControlSignal::default();
        };
        let feet = player.bottom();
        let candidates = world.platforms.iter().filter(|p| !p.is_broken());
        let target = if player.vel.y > 0.0 {
            candidates
                .filter(|p| p.pos.y >= feet)
                .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        } else {
            candidates
                .filter(|p| p.pos.y < feet)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        };
        let horizontal = target.map_or(0.0, |p| {
            ((p.center_x() - player.center().x) / 30.0).clamp(-1.0, 1.0)
        });
        ControlSignal {
            horizontal,
            fire: world.time_frames % 20 == 0,
        }
    }

    fn load_roster(path: Option<String>) -> RosterData {
        let Some(path) = path else {
            return RosterData::demo();
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => RosterData::from_csv(&text),
            Err(err) => {
                log::warn!("Failed to read roster {}: {}; using demo roster", path, err);
                RosterData::demo()
            }
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let mut args = std::env::args().skip(1);
        let seed = match args.next().map(|s| s.parse::<u64>()) {
            Some(Ok(seed)) => seed,
            Some(Err(err)) => {
                log::warn!("Ignoring seed argument: {}", err);
                rand::random()
            }
            None => rand::random(),
        };
        let roster = load_roster(args.next());

        log::info!("Roster Jump (headless) starting with seed {}", seed);

        let mut session = Session::new(seed, Settings::default());
        session.start_session(roster);

        let mut cues = LogCues;
        let mut summary = Summary::default();
        let mut renderer = HeadlessRenderer::default();
        let max_frames = MAX_SECONDS * FRAME_RATE as u32;

        for frame in 0..max_frames {
            if !session.is_running() {
                break;
            }
            let signal = autopilot(session.world());
            let mut collab = Collaborators {
                cues: &mut cues,
                observer: &mut summary,
                renderer: &mut renderer,
            };
            session.frame(&signal, &mut collab);
            if frame % FRAME_RATE as u32 == 0 {
                renderer.draw(&DrawList::capture(session.world(), session.settings()));
            }
        }

        let world = session.world();
        match summary.ended {
            Some((score, reason)) => {
                println!(
                    "Session ended after {} frames: {:?}, final score {}",
                    world.time_frames, reason, score
                );
            }
            None => {
                println!(
                    "Autopilot still alive after {} frames, score {}",
                    world.time_frames,
                    world.score()
                );
            }
        }
        if let Some(hud) = &renderer.last_hud {
            println!("Difficulty reached: {}", hud.tier_label);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is roster_jump::web::start, this is just to satisfy the compiler
}
