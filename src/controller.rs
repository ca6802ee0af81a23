//! Game controller: the Ready -> Playing -> GameOver state machine
//!
//! Owns the authoritative [`GameState`] and is the only thing that mutates
//! it. Side effects go through injected dependencies (storage, sound,
//! score reporter, session) so the whole thing runs headless in tests.
//! Observers (the renderer) read [`GameController::state`] and drain the
//! event queue on their own schedule.

use crate::audio::{SoundEffect, SoundSink};
use crate::backend::{ScoreReporter, Session};
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::sim::{self, GameEvent, GamePhase, GameState};

pub struct GameController<K, S, R>
where
    K: KeyValueStore,
    S: SoundSink,
    R: ScoreReporter,
{
    state: GameState,
    high_score: HighScore,
    session: Option<Session>,
    store: K,
    sound: S,
    reporter: R,
    events: Vec<GameEvent>,
}

impl<K, S, R> GameController<K, S, R>
where
    K: KeyValueStore,
    S: SoundSink,
    R: ScoreReporter,
{
    /// Create a controller in Ready, loading the high score from `store`
    pub fn new(seed: u64, store: K, sound: S, reporter: R) -> Self {
        let high_score = HighScore::load(&store);
        Self {
            state: GameState::new(seed),
            high_score,
            session: None,
            store,
            sound,
            reporter,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for tools and tests (e.g. forcing positions)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Sign in or out. Only affects where future scores are submitted.
    pub fn set_session(&mut self, session: Option<Session>) {
        match &session {
            Some(s) => log::info!("Signed in as {}", s.user.display_name),
            None if self.session.is_some() => log::info!("Signed out"),
            None => {}
        }
        self.session = session;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.sound.set_volume(volume);
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut K {
        &mut self.store
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Flap. In Ready this also starts the run, so the first input is never
    /// wasted. Ignored in Paused and GameOver.
    pub fn jump(&mut self) {
        match self.state.phase {
            GamePhase::Ready => {
                self.state.phase = GamePhase::Playing;
                log::info!("Run started");
                self.emit(GameEvent::Started);
                self.flap();
            }
            GamePhase::Playing => self.flap(),
            GamePhase::Paused | GamePhase::GameOver => {}
        }
    }

    fn flap(&mut self) {
        sim::apply_jump(&mut self.state.bird);
        self.sound.play(SoundEffect::Flap);
        self.emit(GameEvent::Jumped);
    }

    /// Reset bird, pipes and score and return to Ready.
    /// Ignored mid-run; repeated calls yield the same Ready state.
    pub fn restart(&mut self) {
        if self.state.phase == GamePhase::Playing {
            return;
        }
        self.state.reset();
        self.emit(GameEvent::Reset);
    }

    /// The single "action" button: flap, or restart after a crash
    pub fn primary_input(&mut self) {
        match self.state.phase {
            GamePhase::GameOver => self.restart(),
            GamePhase::Paused => self.resume(),
            GamePhase::Ready | GamePhase::Playing => self.jump(),
        }
    }

    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.state.phase = GamePhase::Paused;
            log::info!("Paused");
            self.emit(GameEvent::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Playing;
            log::info!("Resumed");
            self.emit(GameEvent::Resumed);
        }
    }

    /// Advance one fixed tick. Does nothing unless Playing.
    pub fn tick(&mut self) {
        if !self.state.phase.is_running() {
            return;
        }

        let outcome = sim::tick(&mut self.state);

        if outcome.passed > 0 {
            self.sound.play(SoundEffect::Score);
            self.emit(GameEvent::Scored {
                score: self.state.score,
            });
        }

        if let Some(kind) = outcome.collision {
            log::info!("Crashed ({:?}) with score {}", kind, self.state.score);
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.state.phase = GamePhase::GameOver;
        let score = self.state.score;

        let new_high_score = self.high_score.beats(score);
        if new_high_score {
            if let Err(e) = self.high_score.record(score, &mut self.store) {
                log::warn!("Could not persist high score: {}", e);
            }
            if let Some(session) = &self.session {
                self.reporter.submit(session, score);
            }
        }

        self.sound.play(if new_high_score {
            SoundEffect::HighScore
        } else {
            SoundEffect::Hit
        });
        self.emit(GameEvent::Crashed {
            score,
            new_high_score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;
    use crate::backend::{RecordingReporter, User};
    use crate::consts::*;
    use crate::highscores::HIGH_SCORE_KEY;
    use crate::persistence::MemoryStore;

    type TestController = GameController<MemoryStore, RecordingSink, RecordingReporter>;

    fn controller() -> TestController {
        GameController::new(
            1,
            MemoryStore::new(),
            RecordingSink::default(),
            RecordingReporter::default(),
        )
    }

    fn crash(c: &mut TestController) {
        c.state_mut().bird.y = -1.0;
        c.state_mut().bird.velocity = JUMP_STRENGTH;
        c.tick();
    }

    #[test]
    fn test_jump_from_ready_starts_and_flaps() {
        let mut c = controller();
        c.jump();
        assert_eq!(c.phase(), GamePhase::Playing);
        assert_eq!(c.state().bird.velocity, JUMP_STRENGTH);
        assert_eq!(
            c.drain_events(),
            vec![GameEvent::Started, GameEvent::Jumped]
        );
        assert_eq!(c.sound().played, vec![SoundEffect::Flap]);
    }

    #[test]
    fn test_ready_and_game_over_are_frozen() {
        let mut c = controller();
        let start = c.state().bird.clone();
        for _ in 0..30 {
            c.tick();
        }
        assert_eq!(c.state().bird, start);

        c.jump();
        crash(&mut c);
        assert_eq!(c.phase(), GamePhase::GameOver);
        let frozen = c.state().bird.clone();
        c.tick();
        c.jump();
        assert_eq!(c.state().bird, frozen);
        assert_eq!(c.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut c = controller();
        c.jump();
        c.tick();
        c.restart();
        assert_eq!(c.phase(), GamePhase::Playing);
        assert!(c.state().frame_count > 0);
    }

    #[test]
    fn test_primary_input_restarts_after_crash() {
        let mut c = controller();
        c.primary_input();
        crash(&mut c);
        c.primary_input();
        assert_eq!(c.phase(), GamePhase::Ready);
        c.primary_input();
        assert_eq!(c.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut c = controller();
        c.jump();
        c.pause();
        assert_eq!(c.phase(), GamePhase::Paused);
        let y = c.state().bird.y;
        c.tick();
        c.jump();
        assert_eq!(c.state().bird.y, y);

        c.resume();
        c.tick();
        assert_ne!(c.state().bird.y, y);
    }

    #[test]
    fn test_crash_without_record_plays_hit() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "10").unwrap();
        let mut c = GameController::new(
            1,
            store,
            RecordingSink::default(),
            RecordingReporter::default(),
        );
        c.jump();
        crash(&mut c);
        assert_eq!(c.sound().played.last(), Some(&SoundEffect::Hit));
        assert_eq!(c.high_score(), 10);
    }

    #[test]
    fn test_submission_requires_session() {
        let mut c = controller();
        c.jump();
        c.state_mut().score = 2;
        crash(&mut c);
        assert!(c.reporter().submitted.is_empty());
        assert_eq!(c.high_score(), 2);

        c.restart();
        c.set_session(Some(Session::new(User {
            id: 9,
            display_name: "tern".into(),
            created_at: None,
        })));
        c.jump();
        c.state_mut().score = 4;
        crash(&mut c);
        assert_eq!(c.reporter().submitted, vec![(9, 4)]);
    }

    #[test]
    fn test_storage_failure_does_not_stop_game_over() {
        let mut store = MemoryStore::new();
        store.read_only = true;
        let mut c = GameController::new(
            1,
            store,
            RecordingSink::default(),
            RecordingReporter::default(),
        );
        c.jump();
        c.state_mut().score = 3;
        crash(&mut c);
        assert_eq!(c.phase(), GamePhase::GameOver);
        assert_eq!(c.high_score(), 3);
    }

    #[test]
    fn test_muted_settings_silence_cues() {
        let mut settings = crate::settings::Settings::default();
        settings.muted = true;
        let mut c = controller();
        c.set_volume(settings.effective_volume());
        c.jump();
        assert!(c.sound().played.is_empty());

        settings.muted = false;
        c.set_volume(settings.effective_volume());
        c.jump();
        assert_eq!(c.sound().played, vec![SoundEffect::Flap]);
    }
}
