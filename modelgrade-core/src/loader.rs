//! Dataset loading.
//!
//! [`DatasetLoader`] is the seam between the comparator and wherever model
//! outputs live. [`CsvLoader`] reads comma-separated files with one header row,
//! delegating per-row parsing to a [`RowFormat`].

use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::EvalError;
use crate::metrics::is_probability;
use crate::sample::{BinarySample, Dataset, MulticlassSample, RegressionSample};

/// Loads a named dataset.
pub trait DatasetLoader {
    type Sample;

    fn load(&self, id: &str) -> Result<Dataset<Self::Sample>, EvalError>;
}

/// Turns one CSV record into a sample.
pub trait RowFormat {
    type Sample;

    fn columns(&self) -> usize;

    /// Parse a record already checked to have [`columns`](Self::columns) fields.
    fn parse(&self, row: &Row<'_>) -> Result<Self::Sample, EvalError>;
}

/// A record plus enough context to produce located errors.
pub struct Row<'a> {
    pub source_name: &'a str,
    pub line: u64,
    pub record: &'a StringRecord,
}

impl Row<'_> {
    fn field<T: FromStr>(&self, index: usize, what: &str) -> Result<T, EvalError>
    where
        T::Err: std::fmt::Display,
    {
        let raw = self.record.get(index).unwrap_or_default();
        raw.parse::<T>().map_err(|e| {
            EvalError::parse(
                self.source_name,
                self.line,
                format!("{what} '{raw}' in column {}: {e}", index + 1),
            )
        })
    }

    /// Parse a probability column, rejecting values outside `[0, 1]`.
    fn probability(&self, index: usize) -> Result<f64, EvalError> {
        let value: f64 = self.field(index, "probability")?;
        if !is_probability(value) {
            return Err(EvalError::InvalidProbability {
                source_name: self.source_name.to_string(),
                line: self.line,
                value,
            });
        }
        Ok(value)
    }

    fn invalid_label(&self, label: impl ToString, allowed: impl Into<String>) -> EvalError {
        EvalError::InvalidLabel {
            source_name: self.source_name.to_string(),
            line: self.line,
            label: label.to_string(),
            allowed: allowed.into(),
        }
    }
}

/// `actual(0|1), predicted_probability`
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryFormat;

impl RowFormat for BinaryFormat {
    type Sample = BinarySample;

    fn columns(&self) -> usize {
        2
    }

    fn parse(&self, row: &Row<'_>) -> Result<BinarySample, EvalError> {
        let actual: u8 = row.field(0, "label")?;
        if actual > 1 {
            return Err(row.invalid_label(actual, "{0, 1}"));
        }
        let predicted = row.probability(1)?;
        Ok(BinarySample::new(actual, predicted))
    }
}

/// `actual(1..=K), p_1, ..., p_K`. Labels are shifted to 0-based on load.
#[derive(Debug, Clone, Copy)]
pub struct MulticlassFormat {
    pub num_classes: usize,
}

impl MulticlassFormat {
    pub fn new(num_classes: usize) -> Self {
        Self { num_classes }
    }
}

impl RowFormat for MulticlassFormat {
    type Sample = MulticlassSample;

    fn columns(&self) -> usize {
        self.num_classes + 1
    }

    fn parse(&self, row: &Row<'_>) -> Result<MulticlassSample, EvalError> {
        let label: usize = row.field(0, "label")?;
        if label == 0 || label > self.num_classes {
            return Err(row.invalid_label(label, format!("1..={}", self.num_classes)));
        }
        let probabilities = (1..=self.num_classes)
            .map(|i| row.probability(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MulticlassSample::new(label - 1, probabilities))
    }
}

/// `actual_value, predicted_value`
#[derive(Debug, Clone, Copy, Default)]
pub struct RegressionFormat;

impl RowFormat for RegressionFormat {
    type Sample = RegressionSample;

    fn columns(&self) -> usize {
        2
    }

    fn parse(&self, row: &Row<'_>) -> Result<RegressionSample, EvalError> {
        Ok(RegressionSample::new(
            row.field(0, "actual value")?,
            row.field(1, "predicted value")?,
        ))
    }
}

/// Reads datasets from CSV files resolved against a root directory.
#[derive(Debug, Clone)]
pub struct CsvLoader<F> {
    root: PathBuf,
    format: F,
}

impl<F: RowFormat> CsvLoader<F> {
    pub fn new(root: impl Into<PathBuf>, format: F) -> Self {
        Self {
            root: root.into(),
            format,
        }
    }

    pub fn resolve(&self, id: &str) -> PathBuf {
        let path = Path::new(id);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Parse CSV content from any reader. The first line is treated as a
    /// header and skipped.
    pub fn read_from<R: Read>(
        &self,
        source_name: &str,
        reader: R,
    ) -> Result<Dataset<F::Sample>, EvalError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let expected = self.format.columns();
        let mut samples = Vec::new();
        for result in csv_reader.records() {
            let record = result.map_err(|e| EvalError::csv(source_name, e))?;
            let line = record.position().map_or(0, |p| p.line());
            if record.len() != expected {
                return Err(EvalError::ColumnCount {
                    source_name: source_name.to_string(),
                    line,
                    expected,
                    found: record.len(),
                });
            }
            let row = Row {
                source_name,
                line,
                record: &record,
            };
            samples.push(self.format.parse(&row)?);
        }

        if samples.is_empty() {
            return Err(EvalError::empty_dataset(source_name));
        }
        Ok(Dataset::new(source_name, samples))
    }
}

impl<F: RowFormat> DatasetLoader for CsvLoader<F> {
    type Sample = F::Sample;

    fn load(&self, id: &str) -> Result<Dataset<F::Sample>, EvalError> {
        let path = self.resolve(id);
        let file = File::open(&path).map_err(|e| EvalError::io(id, e))?;
        let dataset = self.read_from(id, file)?;
        tracing::debug!(dataset = id, path = %path.display(), rows = dataset.len(), "Loaded dataset");
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_binary_rows() {
        let loader = CsvLoader::new(".", BinaryFormat);
        let data = "true,predicted\n1,0.9\n0, 0.1\n1,0.4\n";
        let dataset = loader.read_from("model_1.csv", data.as_bytes()).unwrap();
        assert_eq!(
            dataset.samples,
            vec![
                BinarySample::new(1, 0.9),
                BinarySample::new(0, 0.1),
                BinarySample::new(1, 0.4),
            ]
        );
    }

    #[test]
    fn test_multiclass_shifts_labels() {
        let loader = CsvLoader::new(".", MulticlassFormat::new(3));
        let data = "y,p1,p2,p3\n3,0.1,0.2,0.7\n1,0.8,0.1,0.1\n";
        let dataset = loader.read_from("model.csv", data.as_bytes()).unwrap();
        assert_eq!(dataset.samples[0].actual, 2);
        assert_eq!(dataset.samples[1].actual, 0);
        assert_eq!(dataset.samples[0].probabilities, vec![0.1, 0.2, 0.7]);
    }

    #[test]
    fn test_multiclass_label_out_of_range() {
        let loader = CsvLoader::new(".", MulticlassFormat::new(3));
        let data = "y,p1,p2,p3\n4,0.1,0.2,0.7\n";
        let err = loader.read_from("model.csv", data.as_bytes()).unwrap_err();
        assert!(matches!(err, EvalError::InvalidLabel { line: 2, .. }));
    }

    #[test]
    fn test_binary_label_must_be_zero_or_one() {
        let loader = CsvLoader::new(".", BinaryFormat);
        let err = loader
            .read_from("m.csv", "y,p\n2,0.4\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, EvalError::InvalidLabel { .. }));
    }

    #[test]
    fn test_binary_probability_out_of_range() {
        let loader = CsvLoader::new(".", BinaryFormat);
        let err = loader
            .read_from("m.csv", "y,p\n0,0.2\n1,1.5\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, EvalError::InvalidProbability { line: 3, .. }));

        let err = loader
            .read_from("m.csv", "y,p\n0,-0.2\n".as_bytes())
            .unwrap_err();
        assert_eq!(err.to_string(), "m.csv, line 2: probability -0.2 is outside [0, 1]");

        let err = loader
            .read_from("m.csv", "y,p\n1,NaN\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, EvalError::InvalidProbability { .. }));
    }

    #[test]
    fn test_multiclass_probability_out_of_range() {
        let loader = CsvLoader::new(".", MulticlassFormat::new(3));
        let data = "y,p1,p2,p3\n1,0.8,0.1,0.1\n2,0.1,inf,0.1\n";
        let err = loader.read_from("model.csv", data.as_bytes()).unwrap_err();
        assert!(matches!(err, EvalError::InvalidProbability { line: 3, .. }));
    }

    #[test]
    fn test_wrong_column_count() {
        let loader = CsvLoader::new(".", RegressionFormat);
        let err = loader
            .read_from("m.csv", "a,p\n1.0,2.0\n3.0\n".as_bytes())
            .unwrap_err();
        assert!(matches!(
            err,
            EvalError::ColumnCount {
                line: 3,
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_unparsable_number() {
        let loader = CsvLoader::new(".", RegressionFormat);
        let err = loader
            .read_from("m.csv", "a,p\n1.0,abc\n".as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("predicted value 'abc'"));
    }

    #[test]
    fn test_header_only_is_empty() {
        let loader = CsvLoader::new(".", RegressionFormat);
        let err = loader.read_from("m.csv", "a,p\n".as_bytes()).unwrap_err();
        assert!(matches!(err, EvalError::EmptyDataset(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CsvLoader::new(dir.path(), BinaryFormat);
        let err = loader.load("missing.csv").unwrap_err();
        assert!(matches!(err, EvalError::Io { .. }));
    }

    #[test]
    fn test_load_resolves_against_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("model_1.csv"), "a,p\n3,2\n5,5\n").unwrap();
        let loader = CsvLoader::new(dir.path(), RegressionFormat);
        let dataset = loader.load("model_1.csv").unwrap();
        assert_eq!(dataset.name, "model_1.csv");
        assert_eq!(dataset.len(), 2);
    }
}
