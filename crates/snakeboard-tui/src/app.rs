// App orchestrator: owns the board session and the text store.
//
// The TUI sends `UserCommand`s; every command that changes the board is
// answered with a full `BoardSnapshot`. Text changes are written to the
// store after a quiet period, and once more on shutdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use snakeboard_core::config::{Config, MAX_TEAMS};
use snakeboard_core::draft::parser::{normalize_line_endings, parse_all, ParseError};
use snakeboard_core::draft::session::BoardSession;
use snakeboard_core::presets::Preset;
use snakeboard_core::store::TextStore;

use crate::protocol::{BoardSnapshot, ParseErrorInfo, UiUpdate, UserCommand};

pub const MIN_TEAMS: usize = 1;

/// Where the startup ranking text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    /// Supplied by the caller (e.g. `--file`).
    Seed,
    /// Restored from the text store.
    Store,
    /// First preset, used when nothing was saved.
    Preset(String),
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pub session: BoardSession,
    pub store: Arc<dyn TextStore>,
    pub presets: Vec<Preset>,
    pub active_preset: Option<usize>,
    /// Board text differs from what the store holds.
    pub dirty: bool,
    /// Bumped on every command that changes the board text.
    pub text_revision: u64,
    pub last_saved: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn TextStore>, presets: Vec<Preset>) -> Self {
        let team_count = config.board.team_count.clamp(MIN_TEAMS, MAX_TEAMS);
        let session = BoardSession::with_team_names(team_count, config.board.team_names.clone());

        AppState {
            config,
            session,
            store,
            presets,
            active_preset: None,
            dirty: false,
            text_revision: 0,
            last_saved: None,
        }
    }

    /// Pick the startup text: the seed if given, else the saved text, else
    /// the first preset.
    ///
    /// A store that fails to load is logged and treated as empty. Line
    /// endings are normalized so a CRLF file edits like any other.
    pub fn restore_text(&mut self, seed: Option<String>) -> TextSource {
        if let Some(text) = seed {
            self.session.set_text(normalize_line_endings(&text));
            self.dirty = true;
            return TextSource::Seed;
        }

        match self.store.load() {
            Ok(Some(stored)) => {
                info!("Restored ranking text saved at {}", stored.saved_at);
                self.session.set_text(normalize_line_endings(&stored.text));
                self.last_saved = Some(stored.saved_at);
                return TextSource::Store;
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to load saved rankings: {:#}", e),
        }

        match self.presets.first() {
            Some(preset) => {
                let name = preset.name.clone();
                self.session.set_text(preset.text.clone());
                self.active_preset = Some(0);
                TextSource::Preset(name)
            }
            None => TextSource::Preset(String::new()),
        }
    }

    /// Apply a command to the session. Returns `true` if the board view
    /// changed and a new snapshot should be sent.
    pub fn apply_command(&mut self, cmd: UserCommand) -> bool {
        match cmd {
            UserCommand::SetText(text) => {
                let changed = self.session.set_text(text);
                if changed {
                    self.dirty = true;
                    self.text_revision += 1;
                    self.active_preset = None;
                }
                changed
            }
            UserCommand::SetTeamCount(count) => {
                let count = count.clamp(MIN_TEAMS, MAX_TEAMS);
                let changed = self.session.set_team_count(count);
                if changed {
                    info!("Team count changed to {}", count);
                }
                changed
            }
            UserCommand::TogglePicked(rank) => match self.session.toggle_picked(rank) {
                Some(picked) => {
                    debug!("Rank {} picked={}", rank, picked);
                    true
                }
                None => {
                    debug!("Ignoring toggle for rank {} not on the board", rank);
                    false
                }
            },
            UserCommand::ClearPicks => {
                if self.session.picked().is_empty() {
                    return false;
                }
                self.session.clear_picks();
                info!("Cleared all picks");
                true
            }
            UserCommand::LoadPreset(idx) => {
                let Some(preset) = self.presets.get(idx) else {
                    warn!("No preset at index {}", idx);
                    return false;
                };
                info!("Loading preset '{}'", preset.name);
                let text = normalize_line_endings(&preset.text);
                if self.session.set_text(text) {
                    self.dirty = true;
                    self.text_revision += 1;
                }
                self.active_preset = Some(idx);
                true
            }
            UserCommand::Quit => false,
        }
    }

    /// Write the board text to the store if it changed since the last save.
    pub fn save_if_dirty(&mut self) -> anyhow::Result<Option<DateTime<Utc>>> {
        if !self.dirty {
            return Ok(None);
        }
        let stored = self.store.save(self.session.text())?;
        self.dirty = false;
        self.last_saved = Some(stored.saved_at);
        debug!("Saved {} bytes of ranking text", stored.text.len());
        Ok(Some(stored.saved_at))
    }

    pub fn build_snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            board: self.session.board().clone(),
            team_count: self.session.team_count(),
            player_count: self.session.players().len(),
            picked: self.session.picked().clone(),
            error: self.session.error().map(ParseErrorInfo::from),
            bad_lines: self.bad_lines(),
        }
    }

    /// Every failing line, collected only when the text has an error.
    fn bad_lines(&self) -> Vec<usize> {
        if self.session.error().is_none() {
            return Vec::new();
        }
        let (_, errors) = parse_all(self.session.text());
        errors.iter().map(ParseError::line_number).collect()
    }

    pub fn preset_names(&self) -> Vec<String> {
        self.presets.iter().map(|p| p.name.clone()).collect()
    }

    fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.config.storage.save_debounce_ms)
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the orchestrator until the TUI quits or its command channel closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let _ = ui_tx.send(UiUpdate::PresetList(state.preset_names())).await;
    if let Some(idx) = state.active_preset {
        let _ = ui_tx.send(UiUpdate::PresetLoaded(idx)).await;
    }
    let _ = ui_tx
        .send(UiUpdate::TextReplaced(state.session.text().to_string()))
        .await;
    send_snapshot(&state, &ui_tx).await;

    let debounce = state.save_debounce();
    let mut save_deadline: Option<Instant> = state.dirty.then(|| Instant::now() + debounce);

    loop {
        let save_timer = async move {
            match save_deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit requested");
                        break;
                    }
                    Some(cmd) => {
                        let replaces_text = matches!(cmd, UserCommand::LoadPreset(_));
                        let revision = state.text_revision;
                        if state.apply_command(cmd) {
                            if replaces_text {
                                let _ = ui_tx
                                    .send(UiUpdate::TextReplaced(state.session.text().to_string()))
                                    .await;
                                if let Some(idx) = state.active_preset {
                                    let _ = ui_tx.send(UiUpdate::PresetLoaded(idx)).await;
                                }
                            }
                            send_snapshot(&state, &ui_tx).await;
                            // Only text edits restart the quiet period
                            if state.text_revision != revision {
                                save_deadline = Some(Instant::now() + debounce);
                            }
                        }
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            _ = save_timer => {
                save_deadline = None;
                flush(&mut state, &ui_tx).await;
            }
        }
    }

    flush(&mut state, &ui_tx).await;
    info!("Application event loop stopped");
    Ok(())
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx
        .send(UiUpdate::StateSnapshot(Box::new(snapshot)))
        .await;
}

/// Save pending text. Failures are reported to the TUI and retried on the
/// next change.
async fn flush(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    match state.save_if_dirty() {
        Ok(Some(at)) => {
            let _ = ui_tx.send(UiUpdate::Saved(at)).await;
        }
        Ok(None) => {}
        Err(e) => {
            warn!("Failed to save rankings: {:#}", e);
            let _ = ui_tx.send(UiUpdate::SaveFailed(e.to_string())).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use snakeboard_core::presets;
    use snakeboard_core::store::MemoryStore;

    const FOUR: &str = "1 Josh Allen QB\n2 Bijan Robinson RB\n3 Ja'Marr Chase WR\n4 Brock Bowers TE";

    /// Store whose saves always fail.
    struct BrokenStore;

    impl TextStore for BrokenStore {
        fn load(&self) -> anyhow::Result<Option<snakeboard_core::store::StoredText>> {
            anyhow::bail!("disk on fire")
        }
        fn save(&self, _text: &str) -> anyhow::Result<snakeboard_core::store::StoredText> {
            anyhow::bail!("disk on fire")
        }
    }

    fn test_config(team_count: usize) -> Config {
        let mut config = Config::default();
        config.board.team_count = team_count;
        config
    }

    fn test_state(team_count: usize) -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            test_config(team_count),
            store.clone(),
            vec![presets::sample()],
        );
        (state, store)
    }

    // -----------------------------------------------------------------------
    // Tests: startup text
    // -----------------------------------------------------------------------

    #[test]
    fn restore_prefers_seed() {
        let (mut state, store) = test_state(3);
        store.save("1 Saved Player QB").unwrap();
        assert_eq!(state.restore_text(Some(FOUR.into())), TextSource::Seed);
        assert_eq!(state.session.players().len(), 4);
        assert!(state.dirty);
    }

    #[test]
    fn restore_normalizes_crlf_seed() {
        let (mut state, store) = test_state(2);
        store.save("1 Old Guy QB\r\n").unwrap();
        state.restore_text(Some("1 A B QB\r\n2 C D RB\r\n".into()));
        assert_eq!(state.session.text(), "1 A B QB\n2 C D RB\n");
        assert!(state.session.error().is_none());

        let (mut state, store) = test_state(2);
        store.save("1 Old Guy QB\r\n2 New Guy RB").unwrap();
        assert_eq!(state.restore_text(None), TextSource::Store);
        assert!(!state.session.text().contains('\r'));
    }

    #[test]
    fn restore_uses_store_before_presets() {
        let (mut state, store) = test_state(3);
        store.save("1 Saved Player QB").unwrap();
        assert_eq!(state.restore_text(None), TextSource::Store);
        assert_eq!(state.session.players()[0].name, "Saved Player");
        assert!(!state.dirty);
        assert!(state.last_saved.is_some());
    }

    #[test]
    fn restore_falls_back_to_first_preset() {
        let (mut state, _store) = test_state(12);
        assert_eq!(
            state.restore_text(None),
            TextSource::Preset(presets::SAMPLE_NAME.into())
        );
        assert_eq!(state.active_preset, Some(0));
        assert_eq!(state.session.board().filled_count(), 24);
    }

    #[test]
    fn restore_survives_broken_store() {
        let mut state = AppState::new(
            test_config(3),
            Arc::new(BrokenStore),
            vec![presets::sample()],
        );
        assert!(matches!(state.restore_text(None), TextSource::Preset(_)));
    }

    // -----------------------------------------------------------------------
    // Tests: commands
    // -----------------------------------------------------------------------

    #[test]
    fn set_text_marks_dirty_and_clears_preset() {
        let (mut state, _store) = test_state(3);
        state.restore_text(None);
        assert!(state.apply_command(UserCommand::SetText(FOUR.into())));
        assert!(state.dirty);
        assert_eq!(state.active_preset, None);
        assert!(!state.apply_command(UserCommand::SetText(FOUR.into())));
    }

    #[test]
    fn team_count_is_clamped() {
        let (mut state, _store) = test_state(3);
        state.apply_command(UserCommand::SetTeamCount(0));
        assert_eq!(state.session.team_count(), MIN_TEAMS);
        state.apply_command(UserCommand::SetTeamCount(500));
        assert_eq!(state.session.team_count(), MAX_TEAMS);
    }

    #[test]
    fn toggle_and_clear_picks() {
        let (mut state, _store) = test_state(2);
        state.apply_command(UserCommand::SetText(FOUR.into()));
        assert!(state.apply_command(UserCommand::TogglePicked(3)));
        assert!(state.build_snapshot().picked.contains(3));
        assert!(!state.apply_command(UserCommand::TogglePicked(99)));
        assert!(state.apply_command(UserCommand::ClearPicks));
        assert!(!state.apply_command(UserCommand::ClearPicks));
    }

    #[test]
    fn toggle_does_not_dirty_store() {
        let (mut state, _store) = test_state(2);
        state.apply_command(UserCommand::SetText(FOUR.into()));
        state.save_if_dirty().unwrap();
        state.apply_command(UserCommand::TogglePicked(1));
        assert!(!state.dirty);
    }

    #[test]
    fn text_revision_tracks_text_changes_only() {
        let (mut state, _store) = test_state(2);
        state.apply_command(UserCommand::SetText(FOUR.into()));
        assert_eq!(state.text_revision, 1);
        state.apply_command(UserCommand::SetText(FOUR.into()));
        state.apply_command(UserCommand::TogglePicked(1));
        state.apply_command(UserCommand::SetTeamCount(3));
        state.apply_command(UserCommand::ClearPicks);
        assert_eq!(state.text_revision, 1);
        state.apply_command(UserCommand::LoadPreset(0));
        assert_eq!(state.text_revision, 2);
    }

    #[test]
    fn load_preset_replaces_text() {
        let (mut state, _store) = test_state(12);
        state.apply_command(UserCommand::SetText(FOUR.into()));
        assert!(state.apply_command(UserCommand::LoadPreset(0)));
        assert_eq!(state.active_preset, Some(0));
        assert_eq!(state.session.players().len(), 24);
        assert!(!state.apply_command(UserCommand::LoadPreset(7)));
    }

    #[test]
    fn snapshot_reports_parse_error() {
        let (mut state, _store) = test_state(2);
        state.apply_command(UserCommand::SetText("1 Josh Allen QB\n\nbroken".into()));
        let snapshot = state.build_snapshot();
        let error = snapshot.error.unwrap();
        assert_eq!(error.line_number, 3);
        assert!(error.message.contains("broken"));
        assert!(snapshot.board.is_empty());
    }

    #[test]
    fn snapshot_lists_every_bad_line() {
        let (mut state, _store) = test_state(2);
        state.apply_command(UserCommand::SetText(FOUR.into()));
        assert!(state.build_snapshot().bad_lines.is_empty());
        state.apply_command(UserCommand::SetText("1 Josh Allen QB\nbad\n3 Ja'Marr Chase WR\nworse".into()));
        assert_eq!(state.build_snapshot().bad_lines, vec![2, 4]);
    }

    #[test]
    fn save_if_dirty_writes_once() {
        let (mut state, store) = test_state(2);
        state.apply_command(UserCommand::SetText(FOUR.into()));
        assert!(state.save_if_dirty().unwrap().is_some());
        assert!(state.save_if_dirty().unwrap().is_none());
        assert_eq!(store.load().unwrap().unwrap().text, FOUR);
    }

    // -----------------------------------------------------------------------
    // Tests: event loop
    // -----------------------------------------------------------------------

    async fn next_snapshot(ui_rx: &mut mpsc::Receiver<UiUpdate>) -> BoardSnapshot {
        loop {
            match ui_rx.recv().await.expect("ui channel closed") {
                UiUpdate::StateSnapshot(s) => return *s,
                _ => continue,
            }
        }
    }

    #[tokio::test]
    async fn run_sends_initial_state() {
        let (mut state, _store) = test_state(12);
        state.restore_text(None);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(16);
        let handle = tokio::spawn(run(cmd_rx, ui_tx, state));

        assert!(matches!(ui_rx.recv().await, Some(UiUpdate::PresetList(names)) if names == vec![presets::SAMPLE_NAME.to_string()]));
        assert!(matches!(ui_rx.recv().await, Some(UiUpdate::PresetLoaded(0))));
        assert!(matches!(ui_rx.recv().await, Some(UiUpdate::TextReplaced(t)) if t == presets::sample().text));
        let snapshot = next_snapshot(&mut ui_rx).await;
        assert_eq!(snapshot.player_count, 24);
        assert_eq!(snapshot.team_count, 12);

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn run_recomputes_on_commands() {
        let (state, _store) = test_state(3);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(64);
        let handle = tokio::spawn(run(cmd_rx, ui_tx, state));
        next_snapshot(&mut ui_rx).await;

        cmd_tx.send(UserCommand::SetText(FOUR.into())).await.unwrap();
        let snapshot = next_snapshot(&mut ui_rx).await;
        assert_eq!(snapshot.board.round_count(), 2);

        cmd_tx.send(UserCommand::SetTeamCount(4)).await.unwrap();
        let snapshot = next_snapshot(&mut ui_rx).await;
        assert_eq!(snapshot.board.round_count(), 1);

        cmd_tx.send(UserCommand::TogglePicked(2)).await.unwrap();
        let snapshot = next_snapshot(&mut ui_rx).await;
        assert!(snapshot.picked.contains(2));

        drop(cmd_tx);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn run_debounces_saves() {
        let (state, store) = test_state(3);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(64);
        let handle = tokio::spawn(run(cmd_rx, ui_tx, state));

        cmd_tx.send(UserCommand::SetText("1 A B QB".into())).await.unwrap();
        cmd_tx.send(UserCommand::SetText(FOUR.into())).await.unwrap();

        let mut saves = 0;
        loop {
            match ui_rx.recv().await {
                Some(UiUpdate::Saved(_)) => {
                    saves += 1;
                    break;
                }
                Some(_) => continue,
                None => panic!("ui channel closed before save"),
            }
        }
        assert_eq!(saves, 1);
        assert_eq!(store.load().unwrap().unwrap().text, FOUR);

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
        // Nothing dirty left, so no second save
        while let Some(update) = ui_rx.recv().await {
            assert!(!matches!(update, UiUpdate::Saved(_)));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_does_not_postpone_pending_save() {
        let (state, store) = test_state(2);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(64);
        let handle = tokio::spawn(run(cmd_rx, ui_tx, state));
        let start = Instant::now();

        cmd_tx.send(UserCommand::SetText(FOUR.into())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        cmd_tx.send(UserCommand::TogglePicked(1)).await.unwrap();

        loop {
            match ui_rx.recv().await {
                Some(UiUpdate::Saved(_)) => break,
                Some(_) => continue,
                None => panic!("ui channel closed before save"),
            }
        }
        // Saved on the 500ms deadline of the edit, not 500ms after the toggle
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(500), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(900), "{elapsed:?}");
        assert_eq!(store.load().unwrap().unwrap().text, FOUR);

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn quit_flushes_pending_text() {
        let (mut state, store) = test_state(3);
        state.config.storage.save_debounce_ms = 10_000;
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, _ui_rx) = mpsc::channel(64);
        let handle = tokio::spawn(run(cmd_rx, ui_tx, state));

        cmd_tx.send(UserCommand::SetText(FOUR.into())).await.unwrap();
        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();

        assert_eq!(store.load().unwrap().unwrap().text, FOUR);
    }

    #[tokio::test]
    async fn save_failure_is_reported() {
        let state = AppState::new(test_config(2), Arc::new(BrokenStore), Vec::new());
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(64);
        let handle = tokio::spawn(run(cmd_rx, ui_tx, state));

        cmd_tx.send(UserCommand::SetText(FOUR.into())).await.unwrap();
        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();

        let mut failed = false;
        while let Some(update) = ui_rx.recv().await {
            if let UiUpdate::SaveFailed(msg) = update {
                assert!(msg.contains("disk on fire"));
                failed = true;
            }
        }
        assert!(failed);
    }
}
