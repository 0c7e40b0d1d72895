// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module contains everything that is necessary to parse a network
//! design instance from its directory, and to write the outcome of a
//! rounding run back to disk.

use std::{fs::{self, File}, io::{BufWriter, Write}, num::{ParseFloatError, ParseIntError}, path::Path, str::FromStr};

use serde_json::json;

use crate::{Completion, Instance, Matrix, NetworkModel, Status, VarId};

/// This enumeration groups the kind of errors that might occur when reading
/// an instance or writing a report. There can be io errors (file unavailable ?),
/// parse errors (a number was expected but the file contains something else)
/// or format errors: the data is well formed but does not describe a valid
/// instance.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// There was an io related error
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    /// The parser expected an integer but got some garbage
    #[error("parse int {0}")]
    ParseInt(#[from] ParseIntError),
    /// The parser expected a real number but got some garbage
    #[error("parse float {0}")]
    ParseFloat(#[from] ParseFloatError),
    /// The summary could not be serialized
    #[error("json {0}")]
    Json(#[from] serde_json::Error),
    /// The file contains no value at all
    #[error("{0} is empty")]
    Empty(&'static str),
    /// The file has a wrong number of (non empty) lines
    #[error("{file}: expected {expected} rows, found {found}")]
    Rows { file: &'static str, expected: usize, found: usize },
    /// One line of the file has a wrong number of values
    #[error("{file}: expected {expected} values on row {row}, found {found}")]
    Columns { file: &'static str, row: usize, expected: usize, found: usize },
    /// The link capacities are not symmetric
    #[error("topology is not symmetric between {i} and {j}")]
    Asymmetric { i: usize, j: usize },
    /// A server is located on a router which does not exist
    #[error("cdn {cdn} has a server at unknown router {router}")]
    Location { cdn: usize, router: usize },
    /// A cdn has two servers on the same router
    #[error("cdn {cdn} has two servers at router {router}")]
    Duplicate { cdn: usize, router: usize },
    /// The capacities of a cdn are not aligned with its locations
    #[error("cdn {cdn} has {locations} locations but {capacities} capacities")]
    Mismatch { cdn: usize, locations: usize, capacities: usize },
}

/// This function reads the instance stored in the given directory. It returns
/// either the instance if everything went on well, or an error describing the
/// problem.
pub fn read_instance<P: AsRef<Path>>(dir: P) -> Result<Instance, Error> {
    let dir = dir.as_ref();
    let routers = read_count(dir, "rcount")?;
    let cdns = read_count(dir, "ccount")?;
    let r2r = read_matrix(dir, "r2r.int", routers, routers)?;
    let r2cdn = read_matrix(dir, "r2cdn.int", routers, cdns)?;
    let topo = read_matrix(dir, "topo.txt", routers, routers)?;
    let locations = read_lists::<usize>(dir, "cdnl.int")?;
    let capacities = read_lists::<f64>(dir, "cdnc.int")?;

    if locations.len() != cdns {
        return Err(Error::Rows { file: "cdnl.int", expected: cdns, found: locations.len() });
    }
    if capacities.len() != cdns {
        return Err(Error::Rows { file: "cdnc.int", expected: cdns, found: capacities.len() });
    }
    for i in 0..routers {
        for j in i + 1..routers {
            if topo[(i, j)] != topo[(j, i)] {
                return Err(Error::Asymmetric { i, j });
            }
        }
    }
    for (cdn, (locs, caps)) in locations.iter().zip(capacities.iter()).enumerate() {
        if locs.len() != caps.len() {
            return Err(Error::Mismatch { cdn, locations: locs.len(), capacities: caps.len() });
        }
        for (k, router) in locs.iter().copied().enumerate() {
            if router >= routers {
                return Err(Error::Location { cdn, router });
            }
            if locs[..k].contains(&router) {
                return Err(Error::Duplicate { cdn, router });
            }
        }
    }

    Ok(Instance { routers, cdns, r2r, r2cdn, topo, locations, capacities })
}

fn read_count(dir: &Path, file: &'static str) -> Result<usize, Error> {
    let text = fs::read_to_string(dir.join(file))?;
    let token = text.split_whitespace().next().ok_or(Error::Empty(file))?;
    Ok(token.parse::<usize>()?)
}

fn read_matrix(dir: &Path, file: &'static str, rows: usize, cols: usize) -> Result<Matrix, Error> {
    let text = fs::read_to_string(dir.join(file))?;
    let lines = text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>();

    let mut matrix = Matrix::new(rows, cols);
    // a matrix without columns is stored as blank lines (or nothing)
    if cols == 0 {
        return match lines.first() {
            None => Ok(matrix),
            Some(line) => Err(Error::Columns { file, row: 0, expected: 0, found: line.split_whitespace().count() }),
        };
    }
    if lines.len() != rows {
        return Err(Error::Rows { file, expected: rows, found: lines.len() });
    }
    for (i, line) in lines.iter().enumerate() {
        let values = line.split_whitespace()
            .map(str::parse::<f64>)
            .collect::<Result<Vec<_>, _>>()?;
        if values.len() != cols {
            return Err(Error::Columns { file, row: i, expected: cols, found: values.len() });
        }
        for (j, v) in values.into_iter().enumerate() {
            matrix[(i, j)] = v;
        }
    }
    Ok(matrix)
}

/// Reads one list of values per line. The first blank line ends the file.
fn read_lists<T>(dir: &Path, file: &'static str) -> Result<Vec<Vec<T>>, Error>
where T: FromStr, Error: From<T::Err>
{
    let text = fs::read_to_string(dir.join(file))?;
    let mut lists = vec![];
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        lists.push(line.split_whitespace()
            .map(str::parse::<T>)
            .collect::<Result<Vec<_>, _>>()?);
    }
    Ok(lists)
}

/// The value every entry of a report takes when the rounding failed
pub const FAILED: f64 = -1.0;

/// The final values of a rounding run
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub status: Status,
    pub relaxations: usize,
    pub objective: f64,
    /// The link variables: x[a][b] for a < b, zero elsewhere
    pub x: Matrix,
    /// The cache installation variables
    pub y: Vec<f64>,
    /// The cache activation variables
    pub z: Vec<f64>,
    /// One row per source: its flow on each pair of routers (row major)
    pub f: Vec<Vec<f64>>,
}

impl Report {
    /// Gathers the values of the final relaxation. When the run failed, all
    /// values are set to the `FAILED` sentinel.
    pub fn collect(model: &NetworkModel, completion: &Completion) -> Self {
        let n = model.routers();
        let assignment = match completion.assignment.as_ref() {
            Some(assignment) if completion.is_success() => assignment,
            _ => return Self::failed(n, completion),
        };
        let value = |var: Option<VarId>| var.map(|v| assignment[v]).unwrap_or(0.0);
        let registry = model.registry();

        let mut x = Matrix::new(n, n);
        for e in registry.edges().iter().copied() {
            x[(e.a, e.b)] = value(registry.x_var(e));
        }
        let y = (0..n).map(|i| value(registry.y_var(i))).collect();
        let z = (0..n).map(|i| value(registry.z_var(i))).collect();
        let f = (0..n)
            .map(|src| {
                let mut row = Vec::with_capacity(n * n);
                for i in 0..n {
                    for j in 0..n {
                        row.push(value(model.flows().flow(src, i, j)));
                    }
                }
                row
            })
            .collect();

        Report {
            status: completion.status.clone(),
            relaxations: completion.relaxations,
            objective: assignment.objective(),
            x, y, z, f,
        }
    }

    fn failed(n: usize, completion: &Completion) -> Self {
        let mut x = Matrix::new(n, n);
        for i in 0..n {
            for j in 0..n {
                x[(i, j)] = FAILED;
            }
        }
        Report {
            status: completion.status.clone(),
            relaxations: completion.relaxations,
            objective: FAILED,
            x,
            y: vec![FAILED; n],
            z: vec![FAILED; n],
            f: vec![vec![FAILED; n * n]; n],
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, Status::Integral)
    }
    /// The installed links
    pub fn links(&self) -> Vec<(usize, usize)> {
        let n = self.x.rows();
        let mut links = vec![];
        if self.is_success() {
            for a in 0..n {
                for b in a + 1..n {
                    if self.x[(a, b)] > 0.5 {
                        links.push((a, b));
                    }
                }
            }
        }
        links
    }
    /// The installed caches
    pub fn caches(&self) -> Vec<usize> {
        if !self.is_success() {
            return vec![];
        }
        (0..self.y.len()).filter(|i| self.y[*i] > 0.5).collect()
    }
}

/// Writes the report in the given directory (which is created when needed):
/// one file per family of variables, the relaxation count, the objective and
/// a json summary.
pub fn write_report<P: AsRef<Path>>(dir: P, report: &Report) -> Result<(), Error> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let n = report.x.rows();

    let x = (0..n)
        .map(|i| (0..n).map(|j| report.x[(i, j)]).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    write_rows(&dir.join("x.out"), &x)?;
    write_rows(&dir.join("y.out"), std::slice::from_ref(&report.y))?;
    write_rows(&dir.join("z.out"), std::slice::from_ref(&report.z))?;
    write_rows(&dir.join("f.out"), &report.f)?;
    fs::write(dir.join("relaxations.out"), format!("{}\n", report.relaxations))?;
    fs::write(dir.join("obj.out"), format!("{}\n", report.objective))?;

    let (status, reason) = match &report.status {
        Status::Integral => ("integral", None),
        Status::Failed(failure) => ("failed", Some(failure.to_string())),
    };
    let summary = json!({
        "status": status,
        "reason": reason,
        "objective": report.is_success().then_some(report.objective),
        "relaxations": report.relaxations,
        "routers": n,
        "links": report.links(),
        "caches": report.caches(),
    });
    let file = BufWriter::new(File::create(dir.join("summary.json"))?);
    serde_json::to_writer_pretty(file, &summary)?;
    Ok(())
}

fn write_rows(path: &Path, rows: &[Vec<f64>]) -> Result<(), Error> {
    let mut out = BufWriter::new(File::create(path)?);
    for row in rows {
        for v in row {
            write!(out, "{v} ")?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
