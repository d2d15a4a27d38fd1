use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tally_game::{
    Category, GameState, Mark, RulesConfig, ScoreBreakdown, Section, grand_total, leaderboard,
    remaining_categories, section_total, upper_bonus,
};

const SEEDS: [u64; 6] = [0, 1, 7, 42, 0xC0FF_EE, 0xDEAD_BEEF];

fn random_mark(rng: &mut ChaCha20Rng, category: Category) -> Mark {
    if rng.gen_bool(0.2) {
        Mark::Crossed
    } else {
        Mark::Points(rng.gen_range(0..=category.max_score()))
    }
}

/// Seat `players` players and fill a random share of their cells.
fn random_game(seed: u64, players: usize, fill_ratio: f64) -> GameState {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut state = GameState::new();
    for idx in 0..players {
        state
            .add_player(format!("p{idx}"), &format!("Player {idx}"))
            .unwrap();
    }
    for idx in 0..players {
        let id = format!("p{idx}");
        for category in Category::ALL {
            if rng.gen_bool(fill_ratio) {
                let mark = random_mark(&mut rng, category);
                state.record_score(&id, category, mark).unwrap();
            }
        }
    }
    state
}

#[test]
fn grand_total_is_sum_of_parts() {
    for seed in SEEDS {
        let state = random_game(seed, 4, 0.7);
        for player in state.players() {
            let upper = section_total(player, Section::Upper);
            let lower = section_total(player, Section::Lower);
            assert_eq!(grand_total(player), upper + upper_bonus(player) + lower);

            let breakdown = ScoreBreakdown::for_player(player);
            assert_eq!(breakdown.grand_total, grand_total(player));
            assert_eq!(
                breakdown.upper_bonus,
                if upper >= 63 { 35 } else { 0 },
                "seed {seed}: upper {upper}"
            );
        }
    }
}

#[test]
fn totals_never_exceed_category_maxima() {
    let ceiling: u32 = Category::ALL.iter().map(|c| c.max_score()).sum::<u32>()
        + RulesConfig::default().upper_bonus;
    for seed in SEEDS {
        let state = random_game(seed, 3, 1.0);
        assert!(state.is_complete());
        for player in state.players() {
            assert!(grand_total(player) <= ceiling);
        }
    }
}

#[test]
fn leaderboard_is_sorted_and_complete() {
    for seed in SEEDS {
        let state = random_game(seed, 6, 0.5);
        let board = leaderboard(state.players());
        assert_eq!(board.len(), state.players().len());
        for pair in board.ranking.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.total_score > b.total_score
                    || (a.total_score == b.total_score
                        && a.upper_section_total >= b.upper_section_total),
                "seed {seed}: {a:?} ranked above {b:?}"
            );
        }
        for player in state.players() {
            let entry = board
                .iter()
                .find(|entry| entry.player_id == player.id)
                .unwrap();
            assert_eq!(entry.total_score, grand_total(player));
        }
    }
}

#[test]
fn winner_only_after_every_cell_is_filled() {
    for seed in SEEDS {
        let mut state = random_game(seed, 3, 0.6);
        let mut rng = ChaCha20Rng::seed_from_u64(seed ^ 0xFFFF);
        let ids: Vec<String> = state.players().iter().map(|p| p.id.to_string()).collect();
        loop {
            let open: Vec<(String, Category)> = ids
                .iter()
                .flat_map(|id| {
                    let player = state.player(id).unwrap();
                    remaining_categories(player)
                        .map(|category| (id.clone(), category))
                        .collect::<Vec<_>>()
                })
                .collect();
            if open.is_empty() {
                break;
            }
            assert!(state.winner().is_none(), "seed {seed}");
            let (id, category) = &open[rng.gen_range(0..open.len())];
            let mark = random_mark(&mut rng, *category);
            state.record_score(id, *category, mark).unwrap();
        }
        assert!(state.is_complete());
        let leader = state.leaderboard().leader().cloned();
        assert_eq!(state.winner(), leader);
    }
}

#[test]
fn every_recorded_cell_rejects_a_second_write() {
    let mut state = random_game(99, 2, 0.5);
    let filled: Vec<(String, Category)> = state
        .players()
        .iter()
        .flat_map(|player| {
            player
                .scores
                .iter()
                .map(|(category, _)| (player.id.to_string(), category))
                .collect::<Vec<_>>()
        })
        .collect();
    assert!(!filled.is_empty());
    for (id, category) in filled {
        let before = state.entry(&id, category);
        assert!(state.record_score(&id, category, Mark::Points(1)).is_err());
        assert_eq!(state.entry(&id, category), before);
    }
}
