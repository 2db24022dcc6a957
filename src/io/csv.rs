/*!
# Saving Traces to CSV

Writes a draw history to a CSV file so it can be plotted or tabulated elsewhere.
Enable via the `csv` feature.
*/

use std::error::Error;
use std::fs::File;
use std::path::Path;

use csv::Writer;
use ndarray::{ArrayView2, Axis};

/**
Saves draws of shape `(n_draws, dim)` as CSV.

The file has a header row with `"iteration"` followed by one column per parameter,
named after `names` or `"theta_0"`, `"theta_1"`, … when `names` is `None`. Each
following row is one draw.

# Examples

```rust
use mini_rwmh::io::csv::save_trace_csv;
use ndarray::array;

let draws = array![[0.1, 2.0], [0.2, 2.5]];
let path = std::env::temp_dir().join("trace.csv");
save_trace_csv(draws.view(), Some(&["brand", "price"][..]), &path)?;
let text = std::fs::read_to_string(&path)?;
assert_eq!(text.lines().next(), Some("iteration,brand,price"));
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/
pub fn save_trace_csv<P: AsRef<Path>>(
    draws: ArrayView2<f64>,
    names: Option<&[&str]>,
    path: P,
) -> Result<(), Box<dyn Error>> {
    let n_dims = draws.ncols();
    let mut header: Vec<String> = vec!["iteration".to_string()];
    match names {
        Some(names) if names.len() != n_dims => {
            return Err(format!("{} names given for {} parameters", names.len(), n_dims).into());
        }
        Some(names) => header.extend(names.iter().map(|n| n.to_string())),
        None => header.extend((0..n_dims).map(|i| format!("theta_{i}"))),
    }

    let mut wtr = Writer::from_writer(File::create(path)?);
    wtr.write_record(&header)?;
    for (i, draw) in draws.axis_iter(Axis(0)).enumerate() {
        let mut row = vec![i.to_string()];
        row.extend(draw.iter().map(|v| v.to_string()));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::NamedTempFile;

    #[test]
    fn writes_header_and_rows() -> Result<(), Box<dyn Error>> {
        let file = NamedTempFile::new()?;
        let draws = array![[1.0, -1.5], [2.0, 0.25], [3.0, 4.0]];
        save_trace_csv(draws.view(), None, file.path())?;

        let mut rdr = csv::Reader::from_path(file.path())?;
        assert_eq!(
            rdr.headers()?.iter().collect::<Vec<_>>(),
            vec!["iteration", "theta_0", "theta_1"]
        );
        let rows: Vec<Vec<f64>> = rdr
            .records()
            .map(|r| r.map(|rec| rec.iter().map(|v| v.parse().unwrap()).collect()))
            .collect::<Result<_, _>>()?;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec![1.0, 2.0, 0.25]);
        Ok(())
    }

    #[test]
    fn rejects_wrong_number_of_names() {
        let file = NamedTempFile::new().unwrap();
        let draws = array![[1.0, 2.0]];
        assert!(save_trace_csv(draws.view(), Some(&["only_one"][..]), file.path()).is_err());
    }
}
