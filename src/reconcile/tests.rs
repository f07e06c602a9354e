use std::str::FromStr;

use super::*;
use crate::data::{OddsRow, ResultRow};
use crate::odds::win_probability;
use crate::testing::{date, directory, push_game, result_row, season, MemorySource};

fn odds() -> Vec<OddsRow> {
    let mut rows = vec![];
    push_game(&mut rows, date(2018, 10, 3), ("Montreal", 1, "+170"), ("Toronto", 3, "-200"));
    push_game(&mut rows, date(2018, 10, 3), ("Boston", 0, "110"), ("Washington", 7, "-130"));
    push_game(&mut rows, date(2018, 10, 4), ("Anaheim", 2, "120"), ("San Jose", 1, "-140"));
    push_game(&mut rows, date(2018, 10, 5), ("Columbus", 4, "105"), ("Tampa Bay", 2, "-125"));
    rows
}

fn results() -> Vec<ResultRow> {
    vec![
        result_row(2, date(2018, 10, 3), "Toronto Maple Leafs", Ending::Regulation),
        result_row(3, date(2018, 10, 3), "Washington Capitals", Ending::Overtime),
        result_row(4, date(2018, 10, 4), "San Jose Sharks", Ending::Shootout),
        result_row(5, date(2018, 10, 6), "Arizona", Ending::Regulation),
    ]
}

fn join(odds: Vec<OddsRow>, results: Vec<ResultRow>) -> Result<Vec<JoinedGame>, SeasonError> {
    let source = MemorySource::default().with_season(season(), odds, results);
    season_data(&source, &directory(), &season())
}

#[test]
fn joins_matching_games() {
    let joined = join(odds(), results()).unwrap();
    assert_eq!(
        vec!["2018-10-03TOR", "2018-10-03WSH", "2018-10-04SJS"],
        joined.iter().map(|game| game.key.to_string()).collect::<Vec<_>>()
    );

    let expected = JoinedGame {
        key: GameKey::new(date(2018, 10, 3), "TOR"),
        home: "TOR".into(),
        visitor: "MTL".into(),
        home_win_prob: round2(win_probability(-200.0, 170.0).unwrap()),
        victor: "TOR".into(),
        ending: Ending::Regulation,
        season: season(),
    };
    assert_eq!(expected, joined[0]);

    let shootout = &joined[2];
    assert_eq!("SJS", shootout.home);
    assert_eq!("ANA", shootout.victor);
    assert_eq!(Ending::Shootout, shootout.ending);
    assert!(shootout.home_win_prob > 50.0);
}

#[test]
fn unmatched_games_excluded() {
    let joined = join(odds(), results()).unwrap();
    assert!(joined.iter().all(|game| game.home != "TBL"), "odds-only game joined");
    assert!(joined.iter().all(|game| game.home != "ARI"), "results-only game joined");
}

#[test]
fn row_order_does_not_matter() {
    let ordered = join(odds(), results()).unwrap();

    let mut pairs: Vec<_> = odds().chunks(2).map(<[OddsRow]>::to_vec).collect();
    pairs.rotate_left(1);
    pairs.swap(0, 2);
    let shuffled_odds = pairs.into_iter().flatten().collect();
    let mut shuffled_results = results();
    shuffled_results.reverse();

    let shuffled = join(shuffled_odds, shuffled_results).unwrap();
    assert_eq!(ordered, shuffled);
}

#[test]
fn repeated_games_dropped() {
    let mut results = results();
    results.push(result_row(6, date(2018, 10, 3), "Toronto", Ending::Shootout));
    let mut odds = odds();
    push_game(&mut odds, date(2018, 10, 4), ("Anaheim", 1, "-300"), ("San Jose", 5, "250"));

    let joined = join(odds, results).unwrap();
    assert_eq!(
        vec!["2018-10-03WSH"],
        joined.iter().map(|game| game.key.to_string()).collect::<Vec<_>>()
    );
}

#[test]
fn repeated_games_independent_of_row_order() {
    let mut results = results();
    results.push(result_row(6, date(2018, 10, 3), "Toronto", Ending::Shootout));
    let forward = join(odds(), results.clone()).unwrap();

    results.reverse();
    let reversed = join(odds(), results).unwrap();
    assert_eq!(forward, reversed);
    assert!(forward.iter().all(|game| game.home != "TOR"), "{forward:?}");
    assert_eq!(2, forward.len());
}

#[test]
fn only_repeated_games_is_empty_join() {
    let results = vec![
        result_row(2, date(2018, 10, 3), "Toronto", Ending::Regulation),
        result_row(3, date(2018, 10, 3), "Toronto Maple Leafs", Ending::Overtime),
    ];
    let err = join(odds(), results).unwrap_err();
    assert!(matches!(err, SeasonError::EmptyJoin(_)), "{err:?}");
}

#[test]
fn level_scores_skipped() {
    let mut odds = odds();
    odds[0].final_score = 3;
    let joined = join(odds, results()).unwrap();
    assert_eq!(
        vec!["WSH", "SJS"],
        joined.iter().map(|game| game.home.as_str()).collect::<Vec<_>>()
    );
}

#[test]
fn names_resolved_per_season() {
    let directory = directory()
        .with_season(season(), [("Arizona", "PHX")])
        .unwrap();
    let mut odds = vec![];
    push_game(&mut odds, date(2018, 10, 6), ("Boston", 1, "150"), ("Arizona", 4, "-170"));
    let results = vec![result_row(2, date(2018, 10, 6), "Arizona", Ending::Regulation)];
    let source = MemorySource::default().with_season(season(), odds, results);

    let joined = season_data(&source, &directory, &season()).unwrap();
    assert_eq!("2018-10-06PHX", joined[0].key.to_string());

    let earlier = Season::from_str("2017-18").unwrap();
    assert_eq!("ARI", directory.for_season(&earlier).code("Arizona"));
}

#[test]
fn empty_join() {
    let results = vec![result_row(2, date(2019, 1, 1), "Toronto", Ending::Regulation)];
    let err = join(odds(), results).unwrap_err();
    assert_eq!(
        "season 2018-19: no games matched between odds and results",
        err.to_string()
    );
    assert!(matches!(err, SeasonError::EmptyJoin(_)), "{err:?}");
}

#[test]
fn missing_tables() {
    let source = MemorySource::default();
    let err = season_data(&source, &directory(), &season()).unwrap_err();
    assert!(matches!(err, SeasonError::DataLoad(_)), "{err:?}");
}
