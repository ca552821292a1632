//! Tests for confirmation gating and minted-baseline restoration on reset.

use super::support::*;

fn scatter(game: &mut Game) {
    let cells = game.visible_cells();
    for &cell in &cells {
        let _ = game.collect(cell);
        let _ = game.collect(cell);
    }
    for &cell in cells.iter().rev().take(4) {
        let _ = game.deposit(cell);
    }
    game.step(Direction::North);
}

#[test]
fn reset_without_typed_yes_changes_nothing() {
    let mut game = crowded_game(3);
    scatter(&mut game);
    let before = game.snapshot_hash();
    for answer in ["", "no", "y", "yes please", "ok"] {
        assert_eq!(game.reset(answer), Err(GameError::ResetNotConfirmed), "answer {answer:?}");
    }
    assert_eq!(game.snapshot_hash(), before);
}

#[test]
fn confirmation_ignores_case_and_surrounding_whitespace() {
    let mut game = scenario_game();
    let _ = game.collect(ORIGIN);
    assert_eq!(game.reset("  YES\n"), Ok(1));
}

#[test]
fn reset_returns_player_to_the_start() {
    let mut game = crowded_game(8);
    scatter(&mut game);
    game.reset("yes").expect("confirmed");

    let start = game.config().start;
    assert_eq!(game.location(), start);
    assert_eq!(game.history(), &[start]);
    assert_eq!(game.points(), 0);
    assert!(game.inventory().is_empty());
}

#[test]
fn every_minted_coin_returns_to_its_origin_exactly_once() {
    let mut game = crowded_game(21);
    let minted = game.cache_snapshot();
    scatter(&mut game);
    assert_ne!(game.cache_snapshot(), minted, "scatter should have moved coins");

    game.reset("yes").expect("confirmed");

    let restored = game.cache_snapshot();
    for (cell, coins) in &minted {
        assert_eq!(restored.get(cell), Some(coins), "cache {cell} should match its mint");
    }
    for cache in game.caches().iter() {
        let cell = cache.cell();
        assert!(cache.coins().iter().all(|coin| coin.origin() == cell), "foreign coin in {cell}");
        assert!(cache.coins().windows(2).all(|pair| pair[0].serial < pair[1].serial));
    }
}

#[test]
fn reset_after_partial_collection_sorts_by_serial() {
    let mut game = scenario_game();
    let _ = game.collect(ORIGIN);
    let _ = game.collect(ORIGIN);
    let _ = game.deposit_coin(ORIGIN, Coin::new(ORIGIN, 3));
    assert_eq!(serials(&game, ORIGIN), vec![0, 1, 3]);

    assert_eq!(game.reset("yes"), Ok(1));
    assert_eq!(serials(&game, ORIGIN), vec![0, 1, 2, 3]);
}

#[test]
fn reset_collapses_duplicated_identities() {
    let mut game = scenario_game();
    let _ = game.collect(ORIGIN);
    let held = game.inventory().coins().to_vec();

    // A stale snapshot that still lists the collected coin in its cache.
    let mut stale = game.cache_snapshot();
    stale.insert(ORIGIN, vec![Coin::new(ORIGIN, 0), Coin::new(ORIGIN, 3)]);
    game.restore_caches(stale);
    assert_eq!(game.total_coins(), 3);
    assert_eq!(held, vec![Coin::new(ORIGIN, 3)]);

    game.reset("yes").expect("confirmed");
    assert_eq!(serials(&game, ORIGIN), vec![0, 3]);
}

#[test]
fn reset_is_logged() {
    let mut game = scenario_game();
    let _ = game.collect(ORIGIN);
    game.reset("yes").expect("confirmed");
    assert_eq!(game.log().last(), Some(&LogEvent::WorldReset { coins_returned: 1 }));
}
