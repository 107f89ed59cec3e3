/// Integration tests for game logic
///
/// These drive a whole session through its public API: key input, ticks,
/// stage buttons and the title-screen cheats.
use mega_invaders::{
    Cheats, Controls, GameConfig, GameSession, InputAction, InputManager, KeyBindings, Level,
    Node, Outcome, Screen, TopMenu,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn seeded(seed: u64) -> GameConfig {
    GameConfig {
        seed: Some(seed),
        ..GameConfig::default()
    }
}

fn run(session: &mut GameSession, ticks: usize) {
    for _ in 0..ticks {
        session.step().unwrap();
    }
}

#[test]
fn test_session_starts_on_wave_with_full_layout() {
    let session = GameSession::new(seeded(1), Cheats::default()).unwrap();

    assert_eq!(session.level(), Level::Wave);
    assert_eq!(session.outcome(), Outcome::InProgress);
    assert_eq!(session.metroids().len(), 18);
    assert!(session.boss().is_none());
    assert_eq!(session.controls(), Controls::default());
    // 18 metroids, the ship and four boundary walls
    assert_eq!(session.scene().len(), 23);
}

#[test]
fn test_metroids_drift_right_then_drop_at_wall() {
    let mut session = GameSession::new(seeded(1), Cheats::default()).unwrap();
    let start_y = session.metroids()[0].y;

    run(&mut session, 10);
    assert_eq!(session.metroids()[0].x, 75.0);
    assert_eq!(session.metroids()[0].y, start_y);

    // The rightmost metroid touches the right wall after 88 ticks
    run(&mut session, 80);
    let last = session.metroids().last().unwrap();
    assert!(last.y > start_y);
    assert_eq!(last.direction, -1.0);
}

#[test]
fn test_ship_moves_while_key_held() {
    let mut session = GameSession::new(seeded(1), Cheats::default()).unwrap();
    let start_x = session.ship().x;

    session.key_pressed("D");
    run(&mut session, 10);
    session.key_released("D");
    run(&mut session, 10);

    assert_eq!(session.ship().x, start_x + 30.0);
}

#[test]
fn test_ship_cannot_leave_bottom_of_box() {
    let mut session = GameSession::new(seeded(1), Cheats::default()).unwrap();
    session.key_pressed("S");
    run(&mut session, 40);

    let ship = session.ship();
    assert!(ship.y + ship.height >= session.boundaries().bottom.y);
    assert!(ship.y <= session.boundaries().bottom.y);
    assert!(!session.held_keys().contains("S"));
}

#[test]
fn test_wave_is_lost_when_metroids_reach_ship_area() {
    let mut session = GameSession::new(seeded(1), Cheats::default()).unwrap();

    let mut ticks = 0;
    while session.is_running() && ticks < 20_000 {
        session.step().unwrap();
        ticks += 1;
    }

    assert_eq!(session.outcome(), Outcome::Lost);
    assert!(session.controls().restart);
    assert!(!session.controls().proceed_to_boss);
    assert!(session.proceed_to_boss().is_ok_and(|proceeded| !proceeded));

    assert!(session.restart().unwrap());
    assert_eq!(session.metroids().len(), 18);
    assert!(session.is_running());
}

#[test]
fn test_boss_button_hidden_during_wave() {
    let mut session = GameSession::new(seeded(1), Cheats::default()).unwrap();
    assert!(!session.proceed_to_boss().unwrap());
    assert!(!session.restart().unwrap());
    assert_eq!(session.level(), Level::Wave);
}

#[test]
fn test_invincibility_does_not_stop_wave_loss() {
    let cheats = Cheats {
        invincible: true,
        ..Cheats::default()
    };
    let mut session = GameSession::new(seeded(5), cheats).unwrap();

    let mut ticks = 0;
    while session.outcome() == Outcome::InProgress && ticks < 20_000 {
        session.step().unwrap();
        ticks += 1;
    }
    // Invincibility only covers boss beams
    assert_eq!(session.outcome(), Outcome::Lost);
}

#[test]
fn test_empty_wave_unlocks_boss_stage() {
    let config = GameConfig {
        enemy_rows: 0,
        ..seeded(2)
    };
    let mut session = GameSession::new(config, Cheats::default()).unwrap();
    session.step().unwrap();
    assert_eq!(session.level(), Level::Cleared);
    assert!(session.proceed_to_boss().unwrap());
    assert_eq!(session.level(), Level::Boss);
    assert_eq!(session.boss().unwrap().health, 5);

    run(&mut session, 45);
    let shapes = session
        .scene()
        .nodes()
        .filter(|node| matches!(node, Node::Shape { .. }))
        .count();
    // four walls plus at least one beam
    assert!(shapes > 4);
}

#[test]
fn test_losing_to_boss_offers_both_buttons() {
    let config = GameConfig {
        enemy_rows: 0,
        ..seeded(4)
    };
    let mut session = GameSession::new(config, Cheats::default()).unwrap();
    session.step().unwrap();
    session.proceed_to_boss().unwrap();

    let mut ticks = 0;
    while session.is_running() && ticks < 1_000 {
        session.step().unwrap();
        ticks += 1;
    }

    assert_eq!(session.outcome(), Outcome::Lost);
    assert_eq!(
        session.controls(),
        Controls {
            proceed_to_boss: true,
            restart: true
        }
    );

    assert!(session.proceed_to_boss().unwrap());
    assert_eq!(session.level(), Level::Boss);
    assert_eq!(session.outcome(), Outcome::InProgress);
    assert!(session.attacks().is_empty());
}

#[test]
fn test_rapid_fire_outpaces_normal_fire() {
    let mut normal = GameSession::new(seeded(1), Cheats::default()).unwrap();
    let rapid_cheats = Cheats {
        rapid_fire: true,
        ..Cheats::default()
    };
    let mut rapid = GameSession::new(seeded(1), rapid_cheats).unwrap();

    for session in [&mut normal, &mut rapid] {
        session.key_pressed("J");
        run(session, 30);
    }
    assert_eq!(normal.missiles().len(), 1);
    assert_eq!(rapid.missiles().len(), 8);
}

#[test]
fn test_menu_cheats_flow_into_session() {
    let mut menu = TopMenu::new();
    for c in "XBULLETY".chars() {
        menu.key_entered(&c.to_string());
    }
    let session = GameSession::new(seeded(1), menu.cheats()).unwrap();
    assert!(session.cheats().rapid_fire);
    assert!(!session.cheats().invincible);
}

#[test]
fn test_arrow_keys_drive_ship_through_input_manager() {
    let mut input = InputManager::new(KeyBindings::default(), true);
    let mut session = GameSession::new(seeded(1), Cheats::default()).unwrap();
    let start_x = session.ship().x;

    input.handle_key_event(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE), Screen::Playing);
    for action in input.get_actions() {
        if let InputAction::KeyDown(key) = action {
            session.key_pressed(&key);
        }
    }
    run(&mut session, 5);

    assert_eq!(session.ship().x, start_x - 15.0);
}
