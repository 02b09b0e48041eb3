use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};
use strum::IntoEnumIterator;

use crate::domain::MatchResult;
use crate::prediction::Prediction;

fn right_col(min_width: usize) -> Col {
    Col::new(Styles::default().with(MinWidth(min_width)).with(HAlign::Right))
}

pub fn tabulate(predictions: &[Prediction]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(24)).with(HAlign::Left)),
            Col::new(
                Styles::default()
                    .with(Separator(true))
                    .with(MinWidth(10))
                    .with(HAlign::Centred),
            ),
            right_col(6),
            right_col(7),
            right_col(7),
            right_col(7),
            Col::new(
                Styles::default()
                    .with(Separator(true))
                    .with(MinWidth(11))
                    .with(HAlign::Centred),
            ),
            right_col(6),
            right_col(7),
            right_col(7),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Left)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Fixture".into(),
                "Result".into(),
                "Conf.".into(),
                "Home".into(),
                "Draw".into(),
                "Away".into(),
                "xG".into(),
                "Score".into(),
                "BTTS".into(),
                "Over".into(),
                "Value".into(),
            ],
        ));

    for prediction in predictions {
        let value = MatchResult::iter()
            .filter(|&result| prediction.value.get(result).is_value)
            .map(|result| result.to_string())
            .collect::<Vec<_>>();
        let value = if value.is_empty() {
            "-".to_string()
        } else {
            value.join(", ")
        };
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{} v {}", prediction.home_team, prediction.away_team).into(),
                prediction.result.to_string().into(),
                format!("{:.1}", prediction.confidence).into(),
                format!("{:.3}", prediction.probabilities.home).into(),
                format!("{:.3}", prediction.probabilities.draw).into(),
                format!("{:.3}", prediction.probabilities.away).into(),
                prediction.expected_goals_label.clone().into(),
                prediction.most_likely_score.to_string().into(),
                format!("{:.3}", prediction.btts.probability).into(),
                format!("{:.3}", prediction.over_under.over_probability).into(),
                value.into(),
            ],
        ));
    }

    table
}

/// Per-outcome value breakdown for one prediction.
pub fn tabulate_value(prediction: &Prediction) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Left)),
            right_col(10),
            right_col(8),
            right_col(8),
            right_col(8),
            Col::new(Styles::default().with(MinWidth(9)).with(HAlign::Centred)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Outcome".into(),
                "Probability".into(),
                "Odds".into(),
                "Edge %".into(),
                "Kelly".into(),
                "".into(),
            ],
        ));

    for result in MatchResult::iter() {
        let bet = prediction.value.get(result);
        table.push_row(Row::new(
            Styles::default(),
            vec![
                result.to_string().into(),
                format!("{:.6}", bet.probability).into(),
                format!("{:.2}", bet.odds).into(),
                format!("{:.2}", bet.edge_percentage()).into(),
                format!("{:.4}", bet.kelly_fraction).into(),
                bet.label().into(),
            ],
        ));
    }

    table
}
