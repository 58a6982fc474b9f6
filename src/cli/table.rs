//! Box-drawing tables for dashboard output
//!
//! Two columns: a left-aligned label and a right-aligned value, with the
//! table title in the header row.

use std::fmt;

use crate::util::Amount;

pub struct Table {
    title: Cell,
    value_label: Cell,
    labels: Vec<Cell>,
    values: Vec<Cell>,
}

struct Cell {
    width: usize,
    text: String,
}

impl Cell {
    fn from(text: String) -> Self {
        let width = text.chars().count();
        Self { width, text }
    }

    fn amount(a: Amount) -> Self {
        Self::from(format!("{}", a))
    }
}

impl Table {
    pub fn new(title: &str, value_label: &str) -> Self {
        Self {
            title: Cell::from(title.to_string()),
            value_label: Cell::from(value_label.to_string()),
            labels: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, label: String, value: String) {
        self.labels.push(Cell::from(label));
        self.values.push(Cell::from(value));
    }

    pub fn push_amount(&mut self, label: String, amount: Amount) {
        self.labels.push(Cell::from(label));
        self.values.push(Cell::amount(amount));
    }

    fn widths(&self) -> (usize, usize) {
        let lw = self
            .labels
            .iter()
            .map(|c| c.width)
            .chain(std::iter::once(self.title.width))
            .max()
            .unwrap_or(0);
        let vw = self
            .values
            .iter()
            .map(|c| c.width)
            .chain(std::iter::once(self.value_label.width))
            .max()
            .unwrap_or(0);
        (lw, vw)
    }
}

const VLINE: &str = "│";
const ULCORNER: &str = "┌";
const URCORNER: &str = "┐";
const DLCORNER: &str = "└";
const DRCORNER: &str = "┘";
const LTJOIN: &str = "┤";
const RTJOIN: &str = "├";
const HIJOIN: &str = "┴";
const LOJOIN: &str = "┬";
const CROSS: &str = "┼";

fn hline(f: &mut fmt::Formatter, width: usize) -> fmt::Result {
    for _ in 0..width + 2 {
        write!(f, "─")?;
    }
    Ok(())
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (lw, vw) = self.widths();
        // upper border
        write!(f, "{}", ULCORNER)?;
        hline(f, lw)?;
        write!(f, "{}", LOJOIN)?;
        hline(f, vw)?;
        writeln!(f, "{}", URCORNER)?;
        // title line
        writeln!(
            f,
            "{} {:<lw$} {} {:>vw$} {}",
            VLINE, self.title.text, VLINE, self.value_label.text, VLINE
        )?;
        // separator
        write!(f, "{}", RTJOIN)?;
        hline(f, lw)?;
        write!(f, "{}", CROSS)?;
        hline(f, vw)?;
        writeln!(f, "{}", LTJOIN)?;
        // main block
        for (label, value) in self.labels.iter().zip(&self.values) {
            writeln!(
                f,
                "{} {:<lw$} {} {:>vw$} {}",
                VLINE, label.text, VLINE, value.text, VLINE
            )?;
        }
        // lower border
        write!(f, "{}", DLCORNER)?;
        hline(f, lw)?;
        write!(f, "{}", HIJOIN)?;
        hline(f, vw)?;
        writeln!(f, "{}", DRCORNER)?;
        Ok(())
    }
}
