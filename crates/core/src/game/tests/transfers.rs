//! Tests for collect/deposit transitions, reach, and mint-once behavior while moving.

use super::support::*;

#[test]
fn scenario_cache_mints_four_coins_and_collect_pops_the_last() {
    let mut game = scenario_game();
    assert_eq!(serials(&game, ORIGIN), vec![0, 1, 2, 3]);
    assert_eq!(game.caches().len(), 1);

    let transfer = game.collect(ORIGIN);

    let expected = Coin { i: 3, j: 5, serial: 3 };
    assert_eq!(transfer, Transfer::Moved(expected));
    assert_eq!(game.inventory().coins(), &[expected]);
    assert_eq!(serials(&game, ORIGIN), vec![0, 1, 2]);
    assert_eq!(game.points(), 1);
}

#[test]
fn deposit_with_empty_inventory_changes_nothing() {
    let mut game = scenario_game();
    let before = game.snapshot_hash();
    let log_len = game.log().len();

    assert_eq!(game.deposit(ORIGIN), Transfer::Skipped(SkipReason::EmptyInventory));

    assert_eq!(game.snapshot_hash(), before);
    assert_eq!(serials(&game, ORIGIN), vec![0, 1, 2, 3]);
    assert!(game.inventory().is_empty());
    assert_eq!(game.points(), 0);
    assert_eq!(game.log().len(), log_len, "no event for a skipped deposit");
}

#[test]
fn collecting_from_an_emptied_cache_is_a_no_op() {
    let mut game = scenario_game();
    for _ in 0..4 {
        assert!(game.collect(ORIGIN).is_moved());
    }
    assert_eq!(game.collect(ORIGIN), Transfer::Skipped(SkipReason::EmptyCache));
    assert_eq!(game.points(), 4);
    assert_eq!(game.inventory().len(), 4);
    assert_eq!(game.caches().get(ORIGIN).map(Cache::len), Some(0));
}

#[test]
fn cells_without_caches_skip_both_transfers() {
    let mut game = scenario_game();
    let empty_cell = Cell::new(3, 6);
    assert!(game.is_within_reach(empty_cell));
    assert_eq!(game.collect(empty_cell), Transfer::Skipped(SkipReason::NoCache));

    let coin = game.collect(ORIGIN).coin().expect("origin has coins");
    assert_eq!(game.deposit(empty_cell), Transfer::Skipped(SkipReason::NoCache));
    assert_eq!(game.inventory().coins(), &[coin]);
}

#[test]
fn caches_outside_the_neighbourhood_are_out_of_reach() {
    let mut game = scenario_game();
    let far = Cell::new(3, 7);
    assert!(!game.is_within_reach(far));
    assert_eq!(game.collect(far), Transfer::Skipped(SkipReason::OutOfReach));
    assert_eq!(game.deposit(far), Transfer::Skipped(SkipReason::OutOfReach));
}

#[test]
fn deposits_are_last_in_first_out_on_both_sides() {
    let mut game = crowded_game(5);
    let source = ORIGIN;
    let target = Cell::new(4, 5);
    let first = game.collect(source).coin().expect("crowded caches hold coins");
    let second = game.collect(source).coin();
    let target_len = game.caches().get(target).map(Cache::len).expect("target spawned");

    let deposited = game.deposit(target).coin().expect("inventory is not empty");

    let latest = second.unwrap_or(first);
    assert_eq!(deposited, latest);
    let target_cache = game.caches().get(target).expect("target spawned");
    assert_eq!(target_cache.len(), target_len + 1);
    assert_eq!(target_cache.coins().last(), Some(&latest));
    assert_eq!(game.points() as usize, game.inventory().len());
}

#[test]
fn a_specific_inventory_coin_can_be_deposited() {
    let mut game = scenario_game();
    let top = game.collect(ORIGIN).coin().expect("coin");
    let next = game.collect(ORIGIN).coin().expect("coin");

    assert_eq!(game.deposit_coin(ORIGIN, top), Transfer::Moved(top));
    assert_eq!(game.inventory().coins(), &[next]);
    assert_eq!(
        game.deposit_coin(ORIGIN, Coin::new(Cell::new(9, 9), 0)),
        Transfer::Skipped(SkipReason::NotInInventory)
    );
    assert_eq!(game.points(), 1);
}

#[test]
fn coin_location_follows_each_transfer() {
    let mut game = scenario_game();
    let coin = Coin::new(ORIGIN, 3);
    assert_eq!(game.locate(coin), Some(CoinLocation::InCache(ORIGIN)));
    let _ = game.collect(ORIGIN);
    assert_eq!(game.locate(coin), Some(CoinLocation::InInventory));
    let _ = game.deposit(ORIGIN);
    assert_eq!(game.locate(coin), Some(CoinLocation::InCache(ORIGIN)));
    assert_eq!(game.locate(Coin::new(ORIGIN, 4)), None);
}

#[test]
fn leaving_and_returning_never_remints() {
    let mut game = scenario_game();
    let _ = game.collect(ORIGIN);
    let minted_events =
        |game: &Game| game.log().iter().filter(|e| matches!(e, LogEvent::CacheMinted { .. })).count();
    assert_eq!(minted_events(&game), 1);

    for _ in 0..5 {
        game.step(Direction::East);
    }
    assert!(!game.is_within_reach(ORIGIN));
    for _ in 0..5 {
        game.step(Direction::West);
    }

    assert!(game.is_within_reach(ORIGIN));
    assert_eq!(serials(&game, ORIGIN), vec![0, 1, 2]);
    assert_eq!(minted_events(&game), 1);
}

#[test]
fn stepping_moves_one_tile_and_extends_history() {
    let mut game = scenario_game();
    game.step(Direction::North);
    assert_eq!(game.current_cell(), Cell::new(4, 5));
    game.step(Direction::West);
    assert_eq!(game.current_cell(), Cell::new(4, 4));
    assert_eq!(game.history().len(), 3);
    assert_eq!(game.history()[0], game.config().start);
    assert!(game.log().contains(&LogEvent::Moved { from: Cell::new(3, 5), to: Cell::new(4, 5) }));
}

#[test]
fn moving_to_the_same_point_does_not_duplicate_history() {
    let mut game = scenario_game();
    let here = game.location();
    game.move_to(here);
    assert_eq!(game.history(), &[here]);
}

#[test]
fn visible_cells_follow_the_player() {
    let mut game = scenario_game();
    let visible = game.visible_cells();
    assert_eq!(visible.len(), 9);
    assert_eq!(visible[4], ORIGIN);
    assert_eq!(game.visible_caches().count(), 1);

    game.step(Direction::South);
    game.step(Direction::South);
    assert_eq!(game.visible_cells()[4], Cell::new(1, 5));
    assert_eq!(game.visible_caches().count(), 0);
}

#[test]
fn crowded_world_conserves_coins_across_mixed_transfers() {
    let mut game = crowded_game(99);
    let baseline = game.total_coins();
    let cells = game.visible_cells();
    for (index, &cell) in cells.iter().enumerate().cycle().take(60) {
        if index % 3 == 0 {
            let _ = game.deposit(cell);
        } else {
            let _ = game.collect(cell);
        }
        assert_eq!(game.total_coins(), baseline);
        assert_eq!(game.points() as usize, game.inventory().len());
    }
}

#[test]
fn scripted_luck_draws_are_used_for_both_decisions() {
    let luck = FixedLuck::new(0.9).with("3,5", 0.099).with("3,5_coins", 0.999);
    let game = Game::with_luck(scenario_config(0), luck);
    assert_eq!(serials(&game, ORIGIN), (0..10).collect::<Vec<u32>>());
}
