use std::{fs, path::Path, str::FromStr};

use itertools::Itertools;
use tracing::{debug, warn};

use crate::{
    error::{Field, FormatError, LineError, LoadError},
    model::{Price, StockCollection, TradingData},
};

/// Fields per CSV line: `code,date,open,high,low,close,volume`.
const CSV_FIELDS: usize = 7;

/// Lines that make up one trading day in a triplet file.
const TRIPLET_GROUP: usize = 6;

/// Turns one file format into trading days attached to a [`StockCollection`].
///
/// Formats only implement [`parse`](StockDataLoader::parse); reading the file
/// and attaching days to stocks is shared by [`load`](StockDataLoader::load).
pub trait StockDataLoader {
    /// Parses a whole file into `(stock code, day)` pairs in file order.
    fn parse(&self, contents: &str) -> Result<Vec<(String, TradingData)>, LineError>;

    /// Reads `path` and appends every parsed day to its stock.
    ///
    /// The whole file is parsed before anything is attached, so a malformed
    /// file leaves `stocks` untouched. Days are never deduplicated.
    fn load(&self, path: &Path, stocks: &mut StockCollection) -> Result<usize, LoadError> {
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;

        let days = self
            .parse(&contents)
            .map_err(|source| LoadError::DataFormat {
                path: path.to_owned(),
                source,
            })?;
        let count = days.len();

        for (code, day) in days {
            stocks.get_stock(&code).add_day_data(day);
        }

        debug!(path = %path.display(), count, "loaded trading days");

        Ok(count)
    }
}

/// `code,date,open,high,low,close,volume`, one day per line.
pub struct CsvLoader;

impl StockDataLoader for CsvLoader {
    fn parse(&self, contents: &str) -> Result<Vec<(String, TradingData)>, LineError> {
        contents
            .lines()
            .enumerate()
            .map(|(ix, line)| {
                parse_csv_line(line).map_err(|reason| LineError {
                    line: ix + 1,
                    reason,
                })
            })
            .collect()
    }
}

fn parse_csv_line(line: &str) -> Result<(String, TradingData), FormatError> {
    let splits = line.split(',').collect_vec();

    let [code, date, open, high, low, close, volume] = splits[..] else {
        return Err(FormatError::FieldCount {
            expected: CSV_FIELDS,
            found: splits.len(),
        });
    };

    let day = TradingData::new(
        date,
        parse_field(Field::Open, open)?,
        parse_field(Field::High, high)?,
        parse_field(Field::Low, low)?,
        parse_field(Field::Close, close)?,
        parse_field(Field::Volume, volume)?,
    );

    Ok((code.to_owned(), day))
}

/// `code:KEY:value` lines, KEY one of `DA OP HI LO CL VO`.
///
/// Every 6 lines form one day, whatever their keys or codes: the day is
/// attached to the code on the 6th line and any key missing from the group
/// keeps its default. A trailing group shorter than 6 lines is dropped.
pub struct TripletLoader;

impl StockDataLoader for TripletLoader {
    fn parse(&self, contents: &str) -> Result<Vec<(String, TradingData)>, LineError> {
        let mut days = Vec::new();
        let mut group = TripletGroup::default();

        for (ix, line) in contents.lines().enumerate() {
            let line_error = |reason| LineError {
                line: ix + 1,
                reason,
            };

            let (code, key, value) = line
                .split(':')
                .collect_tuple()
                .ok_or_else(|| line_error(FormatError::TokenCount(line.to_owned())))?;

            group.set(key, value).map_err(line_error)?;

            if group.lines == TRIPLET_GROUP {
                days.push((code.to_owned(), std::mem::take(&mut group).into_day()));
            }
        }

        if group.lines > 0 {
            warn!(lines = group.lines, "dropping incomplete trailing triplet group");
        }

        Ok(days)
    }
}

#[derive(Default)]
struct TripletGroup {
    date: String,
    open: Price,
    high: Price,
    low: Price,
    close: Price,
    volume: u64,
    lines: usize,
}

impl TripletGroup {
    fn set(&mut self, key: &str, value: &str) -> Result<(), FormatError> {
        match key {
            "DA" => self.date = value.to_owned(),
            "OP" => self.open = parse_field(Field::Open, value)?,
            "HI" => self.high = parse_field(Field::High, value)?,
            "LO" => self.low = parse_field(Field::Low, value)?,
            "CL" => self.close = parse_field(Field::Close, value)?,
            "VO" => self.volume = parse_field(Field::Volume, value)?,
            _ => debug!(key, "ignoring unknown triplet key"),
        }

        self.lines += 1;

        Ok(())
    }

    fn into_day(self) -> TradingData {
        TradingData::new(
            self.date, self.open, self.high, self.low, self.close, self.volume,
        )
    }
}

fn parse_field<T: FromStr>(field: Field, value: &str) -> Result<T, FormatError> {
    value
        .trim()
        .parse()
        .map_err(|_| FormatError::InvalidField {
            field,
            value: value.to_owned(),
        })
}

/// The data file formats, told apart by extension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Triplet,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();

        match extension.as_str() {
            "csv" => Some(FileFormat::Csv),
            "trp" => Some(FileFormat::Triplet),
            _ => None,
        }
    }

    pub fn loader(self) -> &'static dyn StockDataLoader {
        match self {
            FileFormat::Csv => &CsvLoader,
            FileFormat::Triplet => &TripletLoader,
        }
    }

    /// Loads `path` with the loader its extension names.
    pub fn load_path(path: &Path, stocks: &mut StockCollection) -> Result<usize, LoadError> {
        let format =
            Self::from_path(path).ok_or_else(|| LoadError::UnknownFormat(path.to_owned()))?;

        format.loader().load(path, stocks)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{CsvLoader, FileFormat, StockDataLoader, TripletLoader};
    use crate::{
        error::{Field, FormatError, LineError},
        model::TradingData,
    };

    #[test]
    fn unittest_csv_line() -> eyre::Result<()> {
        let days = CsvLoader.parse("ADV,2023-01-01,1.0,2.0,0.5,1.5,100\n")?;

        assert_eq!(
            days,
            vec![(
                "ADV".to_owned(),
                TradingData::new("2023-01-01", 1.0, 2.0, 0.5, 1.5, 100)
            )]
        );

        Ok(())
    }

    #[test]
    fn unittest_csv_crlf_volume() -> eyre::Result<()> {
        let days = CsvLoader.parse("ADV,20170301,1,2,0.5,1.5,42\r\nYOW,20170301,3,4,2,3.5,7\r\n")?;

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].1.volume(), 42);
        assert_eq!(days[1].0, "YOW");

        Ok(())
    }

    #[test]
    fn unittest_csv_wrong_field_count() {
        let err = CsvLoader
            .parse("ADV,2023-01-01,1.0,2.0,0.5,1.5,100\nADV,2023-01-02,1.0,2.0,0.5,1.5\n")
            .unwrap_err();

        assert_eq!(
            err,
            LineError {
                line: 2,
                reason: FormatError::FieldCount {
                    expected: 7,
                    found: 6
                },
            }
        );
    }

    #[test]
    fn unittest_csv_names_bad_field() {
        let err = CsvLoader
            .parse("ADV,2023-01-01,abc,2.0,0.5,1.5,100\n")
            .unwrap_err();

        assert_eq!(
            err.reason,
            FormatError::InvalidField {
                field: Field::Open,
                value: "abc".to_owned()
            }
        );
        assert_eq!(err.to_string(), "line 1: 'open' is not a float: \"abc\"");
    }

    #[test]
    fn unittest_csv_rejects_fractional_volume() {
        let err = CsvLoader
            .parse("ADV,2023-01-01,1.0,2.0,0.5,1.5,1.5\n")
            .unwrap_err();

        assert!(matches!(
            err.reason,
            FormatError::InvalidField {
                field: Field::Volume,
                ..
            }
        ));
    }

    #[test]
    fn unittest_triplet_any_key_order() -> eyre::Result<()> {
        let contents = "ADV:VO:100\nADV:CL:1.5\nADV:DA:2023-01-01\nADV:LO:0.5\nADV:OP:1.0\nADV:HI:2.0\n";
        let days = TripletLoader.parse(contents)?;

        assert_eq!(
            days,
            vec![(
                "ADV".to_owned(),
                TradingData::new("2023-01-01", 1.0, 2.0, 0.5, 1.5, 100)
            )]
        );

        Ok(())
    }

    #[test]
    fn unittest_triplet_groups_by_position() -> eyre::Result<()> {
        // the code changes mid-group and OP repeats, HI never shows up
        let contents = "ADV:DA:20170301\nADV:OP:1.0\nADV:OP:1.25\nYOW:LO:0.5\nYOW:CL:1.5\nYOW:VO:10\n";
        let days = TripletLoader.parse(contents)?;

        assert_eq!(
            days,
            vec![(
                "YOW".to_owned(),
                TradingData::new("20170301", 1.25, 0.0, 0.5, 1.5, 10)
            )]
        );

        Ok(())
    }

    #[test]
    fn unittest_triplet_resets_between_days() -> eyre::Result<()> {
        let contents = "ADV:DA:1\nADV:OP:1\nADV:HI:2\nADV:LO:0.5\nADV:CL:1.5\nADV:VO:10\n\
                        ADV:DA:2\nADV:OP:3\nADV:LO:2\nADV:CL:3.5\nADV:VO:20\nADV:XX:9\n";
        let days = TripletLoader.parse(contents)?;

        assert_eq!(days.len(), 2);
        assert_eq!(days[1].1, TradingData::new("2", 3.0, 0.0, 2.0, 3.5, 20));

        Ok(())
    }

    #[test]
    fn unittest_triplet_drops_trailing_lines() -> eyre::Result<()> {
        let days = TripletLoader.parse("ADV:DA:1\nADV:OP:1\n")?;

        assert!(days.is_empty());

        Ok(())
    }

    #[test]
    fn unittest_triplet_token_count() {
        let err = TripletLoader
            .parse("ADV:DA:1\nADV:OP\n")
            .unwrap_err();

        assert_eq!(err.line, 2);
        assert_eq!(err.reason, FormatError::TokenCount("ADV:OP".to_owned()));
    }

    #[test]
    fn unittest_triplet_bad_number() {
        let err = TripletLoader.parse("ADV:HI:high\n").unwrap_err();

        assert!(matches!(
            err.reason,
            FormatError::InvalidField {
                field: Field::High,
                ..
            }
        ));
    }

    #[test]
    fn unittest_file_format_from_path() {
        assert_eq!(
            FileFormat::from_path(Path::new("march1.csv")),
            Some(FileFormat::Csv)
        );
        assert_eq!(
            FileFormat::from_path(Path::new("data/feb1.TRP")),
            Some(FileFormat::Triplet)
        );
        assert_eq!(FileFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(FileFormat::from_path(Path::new("README")), None);
    }
}
