//! Integration tests for the host engine contract
//!
//! These tests verify that:
//! - A battle scene only talks to its host through the four verbs
//! - Quit and graceful-exit signals end the battle as `Quit`
//! - HP carries over between battles only when reset is turned off
//! - The scene runner loops menu and battles until the player quits

use std::collections::VecDeque;
use std::io::Cursor;

use battler::battle::{BattleOutcome, BattleRules, GameRng, Side, Trainer};
use battler::data::GameDatabase;
use battler::engine::{
    Actor, AutoHost, BattleHost, BattleScene, Choice, ConsoleHost, EngineError, HostSignal, SceneId, SceneRunner,
};

const ARENA_DATA: &str = r#"(
    skills: {
        "smash": (display_name: "Smash", element: Normal, base_damage: 10),
        "poke": (display_name: "Poke", element: Normal, base_damage: 1),
        "pound": (display_name: "Pound", element: Normal, base_damage: 5),
    },
    creatures: {
        "hero": (display_name: "Hero", element: Normal, max_hp: 50, attack: 30, defense: 0, speed: 10, skills: ["smash"]),
        "dummy": (display_name: "Dummy", element: Normal, max_hp: 20, attack: 1, defense: 0, speed: 1, skills: ["poke"]),
        "brute": (display_name: "Brute", element: Normal, max_hp: 999, attack: 5, defense: 100, speed: 20, skills: ["pound"]),
    },
    trainers: {
        "player": (display_name: "Player", creatures: ["hero"]),
        "dummy_trainer": (display_name: "Dummy Trainer", creatures: ["dummy"]),
        "brute_trainer": (display_name: "Brute Trainer", creatures: ["brute"]),
    },
)"#;

fn arena() -> GameDatabase {
    GameDatabase::from_ron_str(ARENA_DATA).unwrap()
}

/// Host that replays scripted player picks; the bot always takes the first
/// option. Running out of script means the player quit.
struct ScriptedHost<'a> {
    db: &'a GameDatabase,
    picks: VecDeque<usize>,
    shown: Vec<(Actor, String)>,
    scenes: Vec<SceneId>,
    quit_called: bool,
}

impl<'a> ScriptedHost<'a> {
    fn new(db: &'a GameDatabase, picks: &[usize]) -> Self {
        Self {
            db,
            picks: picks.iter().copied().collect(),
            shown: Vec::new(),
            scenes: Vec::new(),
            quit_called: false,
        }
    }
}

impl<'a> BattleHost for ScriptedHost<'a> {
    fn create_bot(&mut self, prototype_id: &str) -> Result<Trainer, EngineError> {
        self.db
            .create_trainer(prototype_id)
            .ok_or_else(|| EngineError::UnknownPrototype(prototype_id.to_string()))
    }

    fn wait_for_choice<'o, T: Choice>(
        &mut self,
        actor: Actor,
        _prompt: &str,
        options: &'o [T],
    ) -> Result<&'o T, HostSignal> {
        match actor {
            Actor::Bot => options.first().ok_or(HostSignal::GracefulExit),
            Actor::Player => {
                let pick = self.picks.pop_front().ok_or(HostSignal::Quit)?;
                options.get(pick).ok_or(HostSignal::Quit)
            }
        }
    }

    fn show_text(&mut self, actor: Actor, text: &str) {
        self.shown.push((actor, text.to_string()));
    }

    fn transition(&mut self, scene: SceneId) {
        self.scenes.push(scene);
    }

    fn quit(&mut self) {
        self.quit_called = true;
    }
}

// =============================================================================
// Battle Scene
// =============================================================================

#[test]
fn test_scene_win_reports_summary() {
    let db = arena();
    let mut player = db.create_trainer("player").unwrap();
    let mut host = ScriptedHost::new(&db, &[0]);
    let mut rng = GameRng::from_seed(1);

    let summary = BattleScene::new(&mut player, "dummy_trainer", BattleRules::default(), db.type_chart())
        .run(&mut host, &mut rng)
        .unwrap();

    assert_eq!(summary.outcome, BattleOutcome::Win);
    assert_eq!(summary.turns, 1);
    assert_eq!(summary.opponent_name, "Dummy Trainer");
    assert_eq!(summary.opponent_hp, 0);
    assert_eq!(summary.log.total_damage_by(Side::Player), 40);
    assert!(host
        .shown
        .iter()
        .any(|(actor, line)| *actor == Actor::Player && line == "Hero used Smash!"));
}

#[test]
fn test_quit_signal_ends_battle_as_quit() {
    let db = arena();
    let mut player = db.create_trainer("player").unwrap();
    let mut host = ScriptedHost::new(&db, &[]);
    let mut rng = GameRng::from_seed(1);

    let summary = BattleScene::new(&mut player, "dummy_trainer", BattleRules::default(), db.type_chart())
        .run(&mut host, &mut rng)
        .unwrap();

    assert_eq!(summary.outcome, BattleOutcome::Quit);
    assert_eq!(summary.turns, 0);
}

#[test]
fn test_graceful_exit_ends_battle_as_quit() {
    let db = arena();
    let mut player = db.create_trainer("player").unwrap();
    let mut host = AutoHost::new(&db, GameRng::from_seed(5)).with_choice_budget(0);
    let mut rng = GameRng::from_seed(5);

    let summary = BattleScene::new(&mut player, "brute_trainer", BattleRules::default(), db.type_chart())
        .run(&mut host, &mut rng)
        .unwrap();

    assert_eq!(summary.outcome, BattleOutcome::Quit);
}

#[test]
fn test_unknown_bot_prototype() {
    let db = arena();
    let mut player = db.create_trainer("player").unwrap();
    let mut host = ScriptedHost::new(&db, &[0]);
    let mut rng = GameRng::from_seed(1);

    let err = BattleScene::new(&mut player, "ghost", BattleRules::default(), db.type_chart())
        .run(&mut host, &mut rng)
        .unwrap_err();
    assert_eq!(err, EngineError::UnknownPrototype("ghost".to_string()));
}

#[test]
fn test_hp_carries_over_when_reset_is_off() {
    let db = arena();
    let mut player = db.create_trainer("player").unwrap();
    let rules = BattleRules {
        reset_hp_on_exit: false,
        ..BattleRules::default()
    };

    // One full turn (player pick + bot pick), then the budget runs out.
    // The brute is faster and hits for 5 + 5 - 0 = 10.
    let mut host = AutoHost::new(&db, GameRng::from_seed(3)).with_choice_budget(2);
    let mut rng = GameRng::from_seed(3);
    let summary = BattleScene::new(&mut player, "brute_trainer", rules, db.type_chart())
        .run(&mut host, &mut rng)
        .unwrap();

    assert_eq!(summary.outcome, BattleOutcome::Quit);
    assert_eq!(summary.turns, 1);
    assert_eq!(summary.player_hp, 40);
    assert_eq!(player.active().unwrap().hp, 40);
}

#[test]
fn test_hp_restored_when_reset_is_on() {
    let db = arena();
    let mut player = db.create_trainer("player").unwrap();

    let mut host = AutoHost::new(&db, GameRng::from_seed(3)).with_choice_budget(2);
    let mut rng = GameRng::from_seed(3);
    let summary = BattleScene::new(&mut player, "brute_trainer", BattleRules::default(), db.type_chart())
        .run(&mut host, &mut rng)
        .unwrap();

    assert_eq!(summary.player_hp, 40);
    assert_eq!(player.active().unwrap().hp, 50);
}

#[test]
fn test_auto_host_keeps_both_transcripts() {
    let db = arena();
    let mut player = db.create_trainer("player").unwrap();
    let mut host = AutoHost::new(&db, GameRng::from_seed(8));
    let mut rng = GameRng::from_seed(8);

    let summary = BattleScene::new(&mut player, "dummy_trainer", BattleRules::default(), db.type_chart())
        .run(&mut host, &mut rng)
        .unwrap();

    assert_eq!(summary.outcome, BattleOutcome::Win);
    assert!(host.lines_for(Actor::Player).contains(&"Dummy fainted!"));
    assert!(host.lines_for(Actor::Bot).contains(&"Dummy fainted!"));
    // The opening line is only shown to the player
    assert!(!host
        .lines_for(Actor::Bot)
        .iter()
        .any(|line| line.contains("sends out")));
}

// =============================================================================
// Scene Runner
// =============================================================================

#[test]
fn test_runner_loops_until_quit() {
    let db = arena();
    let mut runner = SceneRunner::from_database(&db, "player", BattleRules::default()).unwrap();
    let mut rng = GameRng::from_seed(11);

    // Menu: [Battle Brute Trainer, Battle Dummy Trainer, Quit]
    // Pick dummy, smash once, pick dummy again, smash, then quit.
    let mut host = ScriptedHost::new(&db, &[1, 0, 1, 0, 2]);
    let history = runner.run(&mut host, &mut rng).unwrap();

    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|s| s.outcome == BattleOutcome::Win));
    assert_eq!(
        host.scenes,
        vec![SceneId::Battle, SceneId::MainMenu, SceneId::Battle, SceneId::MainMenu]
    );
    assert!(host.quit_called);
    assert!(host
        .shown
        .iter()
        .any(|(_, line)| line == BattleOutcome::Win.message()));
}

#[test]
fn test_runner_quits_from_battle() {
    let db = arena();
    let mut runner = SceneRunner::from_database(&db, "player", BattleRules::default()).unwrap();
    let mut rng = GameRng::from_seed(11);

    // Enter the brute battle, then the script runs dry mid-battle
    let mut host = ScriptedHost::new(&db, &[0]);
    let history = runner.run(&mut host, &mut rng).unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].outcome, BattleOutcome::Quit);
    assert!(host.quit_called);
    assert_eq!(runner.player().active().unwrap().hp, 50);
}

#[test]
fn test_runner_with_auto_host_alternates_scenes() {
    let db = arena();
    let mut runner = SceneRunner::from_database(&db, "player", BattleRules::default()).unwrap();
    let mut rng = GameRng::from_seed(21);

    // The budget guarantees the random menu walk ends
    let mut host = AutoHost::new(&db, GameRng::from_seed(21)).with_choice_budget(20);
    let history = runner.run(&mut host, &mut rng).unwrap();

    assert!(host.quit_requested());
    for (i, scene) in host.scenes().iter().enumerate() {
        let expected = if i % 2 == 0 { SceneId::Battle } else { SceneId::MainMenu };
        assert_eq!(*scene, expected);
    }
    let battles = host.scenes().iter().filter(|s| **s == SceneId::Battle).count();
    assert_eq!(history.len(), battles);
}

#[test]
fn test_runner_rejects_unknown_player() {
    let db = arena();
    assert!(SceneRunner::from_database(&db, "nobody", BattleRules::default()).is_err());
}

// =============================================================================
// Console Host
// =============================================================================

#[test]
fn test_console_reprompts_until_valid() {
    let db = arena();
    let skills = db.create_trainer("player").unwrap().creatures[0].skills.clone();
    let input = Cursor::new("abc\n9\n1\n");
    let mut host = ConsoleHost::new(&db, input, Vec::new(), GameRng::from_seed(1));

    let picked = host.wait_for_choice(Actor::Player, "What will Hero do?", &skills).unwrap();
    assert_eq!(picked.display_name, "Smash");

    let output = String::from_utf8(host.into_output()).unwrap();
    assert!(output.contains("What will Hero do?"));
    assert!(output.contains("1) Smash [Normal, power 10]"));
    assert_eq!(output.matches("Please enter a number from 1 to 1").count(), 2);
}

#[test]
fn test_console_quit_and_eof() {
    let db = arena();
    let skills = db.create_trainer("player").unwrap().creatures[0].skills.clone();

    let mut host = ConsoleHost::new(&db, Cursor::new("q\n"), Vec::new(), GameRng::from_seed(1));
    assert_eq!(
        host.wait_for_choice(Actor::Player, "Pick", &skills).unwrap_err(),
        HostSignal::Quit
    );

    let mut host = ConsoleHost::new(&db, Cursor::new(""), Vec::new(), GameRng::from_seed(1));
    assert_eq!(
        host.wait_for_choice(Actor::Player, "Pick", &skills).unwrap_err(),
        HostSignal::Quit
    );
}

#[test]
fn test_console_hides_bot_text() {
    let db = arena();
    let mut host = ConsoleHost::new(&db, Cursor::new(""), Vec::new(), GameRng::from_seed(1));
    host.show_text(Actor::Bot, "secret");
    host.show_text(Actor::Player, "visible");

    let output = String::from_utf8(host.into_output()).unwrap();
    assert!(output.contains("visible"));
    assert!(!output.contains("secret"));
}

#[test]
fn test_console_full_session() {
    let db = arena();
    let mut runner = SceneRunner::from_database(&db, "player", BattleRules::default()).unwrap();
    let mut rng = GameRng::from_seed(4);

    // Battle the dummy, smash, then quit from the menu
    let input = Cursor::new("2\n1\n3\n");
    let mut host = ConsoleHost::new(&db, input, Vec::new(), GameRng::from_seed(4));
    let history = runner.run(&mut host, &mut rng).unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].outcome, BattleOutcome::Win);
    let output = String::from_utf8(host.into_output()).unwrap();
    assert!(output.contains("Battle Dummy Trainer"));
    assert_eq!(output.matches(BattleOutcome::Win.message()).count(), 1);
    assert!(output.contains("Thanks for playing!"));
}
