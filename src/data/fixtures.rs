//! Weather tables shared by the test suites.
use super::dataset::{Dataset, Feature, Value};
use csv::ReaderBuilder;

const WEATHER_NOMINAL: &str = "\
outlook,temperature,humidity,windy,play
sunny,hot,high,FALSE,no
sunny,hot,high,TRUE,no
overcast,hot,high,FALSE,yes
rainy,mild,high,FALSE,yes
rainy,cool,normal,FALSE,yes
rainy,cool,normal,TRUE,no
overcast,cool,normal,TRUE,yes
sunny,mild,high,FALSE,no
sunny,cool,normal,FALSE,yes
rainy,mild,normal,FALSE,yes
sunny,mild,normal,TRUE,yes
overcast,mild,high,TRUE,yes
overcast,hot,normal,FALSE,yes
rainy,mild,high,TRUE,no
";

const WEATHER_NUMERIC: &str = "\
outlook,temperature,humidity,windy,play
sunny,85,85,FALSE,no
sunny,80,90,TRUE,no
overcast,83,86,FALSE,yes
rainy,70,96,FALSE,yes
rainy,68,80,FALSE,yes
rainy,65,70,TRUE,no
overcast,64,65,TRUE,yes
sunny,72,95,FALSE,no
sunny,69,70,FALSE,yes
rainy,75,80,FALSE,yes
sunny,75,70,TRUE,yes
overcast,72,90,TRUE,yes
overcast,81,75,FALSE,yes
rainy,71,91,TRUE,no
";

fn outlook() -> Feature {
    Feature::categorical("outlook", &["sunny", "overcast", "rainy"])
}

fn windy() -> Feature {
    Feature::categorical("windy", &["TRUE", "FALSE"])
}

fn play() -> Feature {
    Feature::categorical("play", &["yes", "no"])
}

/// Parses CSV text against a schema, `?` marks a missing value. The last column is the class.
pub(crate) fn parse(text: &str, features: Vec<Feature>) -> Dataset {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.unwrap();
        let row = record
            .iter()
            .zip(features.iter())
            .map(|(cell, feature)| match cell {
                "?" => Value::Missing,
                _ if feature.is_numeric() => Value::Numeric(cell.parse::<f64>().unwrap()),
                _ => Value::Category(feature.index_of(cell).unwrap()),
            })
            .collect::<Vec<_>>();
        rows.push(row);
    }
    let class_index = features.len() - 1;
    Dataset::from_rows(features, class_index, rows).unwrap()
}

pub(crate) fn weather_nominal() -> Dataset {
    let features = vec![
        outlook(),
        Feature::categorical("temperature", &["hot", "mild", "cool"]),
        Feature::categorical("humidity", &["high", "normal"]),
        windy(),
        play(),
    ];
    parse(WEATHER_NOMINAL, features)
}

pub(crate) fn weather_numeric() -> Dataset {
    let features = vec![
        outlook(),
        Feature::numeric("temperature"),
        Feature::numeric("humidity"),
        windy(),
        play(),
    ];
    parse(WEATHER_NUMERIC, features)
}

/// Numeric weather with a few holes punched into it.
pub(crate) fn weather_numeric_with_gaps() -> Dataset {
    let text = WEATHER_NUMERIC
        .replacen("sunny,85,85,FALSE,no", "sunny,85,?,FALSE,no", 1)
        .replacen("rainy,68,80,FALSE,yes", "?,68,80,FALSE,yes", 1)
        .replacen("overcast,72,90,TRUE,yes", "overcast,?,90,?,yes", 1);
    let features = vec![
        outlook(),
        Feature::numeric("temperature"),
        Feature::numeric("humidity"),
        windy(),
        play(),
    ];
    parse(&text, features)
}
