//! Tabulation of a run's results for the console.

use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Cell, Col, Row, Table};

use crate::accuracy::{Score, SeasonAccuracy};
use crate::batch::SeasonFailure;

fn score_cell(score: &Score) -> Cell {
    Cell::new(
        Styles::default().with(HAlign::Right),
        format!("{:.2}", score.accuracy).into(),
    )
}

fn count_cell(score: &Score) -> Cell {
    Cell::new(
        Styles::default().with(HAlign::Right),
        format!("{}/{}", score.correct, score.total).into(),
    )
}

/// One row per season: the accuracy of each partition, then the game counts behind it.
pub fn tabulate_accuracies<'a>(accuracies: impl IntoIterator<Item = &'a SeasonAccuracy>) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![Col::new(Styles::default().with(MinWidth(9)))];
            for _ in 0..4 {
                cols.push(Col::new(Styles::default().with(MinWidth(9))));
            }
            cols.push(Col::new(Styles::default().with(Separator(true)).with(MinWidth(2))));
            for _ in 0..4 {
                cols.push(Col::new(Styles::default().with(MinWidth(9))));
            }
            cols
        })
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Season".into(),
                "Overall %".into(),
                "RT %".into(),
                "OT %".into(),
                "SO %".into(),
                "".into(),
                "Overall".into(),
                "RT".into(),
                "OT".into(),
                "SO".into(),
            ],
        ));
    for accuracy in accuracies {
        let scores = [
            &accuracy.overall,
            &accuracy.regulation,
            &accuracy.overtime,
            &accuracy.shootout,
        ];
        let mut cells = vec![accuracy.season.to_string().into()];
        cells.extend(scores.iter().map(|score| score_cell(score)));
        cells.push("".into());
        cells.extend(scores.iter().map(|score| count_cell(score)));
        table.push_row(Row::new(Styles::default(), cells));
    }
    table
}

pub fn tabulate_failures<'a>(failures: impl IntoIterator<Item = &'a SeasonFailure>) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(9))),
            Col::new(Styles::default().with(MinWidth(40))),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Season".into(), "Error".into()],
        ));
    table.push_rows(failures.into_iter().map(|failure| {
        Row::new(
            Styles::default(),
            vec![failure.season.to_string().into(), failure.error.to_string().into()],
        )
    }));
    table
}
