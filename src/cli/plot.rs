//! SVG rendering of the daily expense series
//!
//! One bar per calendar-day bucket. The output is a standalone SVG file;
//! the tables remain the terminal rendering.

use std::path::Path;

use svg::{
    node::element::{Line, Rectangle},
    Document,
};

use crate::summary::DailyBucket;

const BAR_FILL: &str = "#8B5CF6";

pub struct Plotter<'d> {
    data: &'d [DailyBucket],
}

impl<'d> Plotter<'d> {
    pub fn from(data: &'d [DailyBucket]) -> Self {
        Self { data }
    }

    pub fn save_bar_chart(&self, file: &Path) -> std::io::Result<()> {
        let fheight = 700.0;
        let fwidth = 1000.0;
        let stroke_width = 2.0;
        let margin = 20.0;
        let ymax = self
            .data
            .iter()
            .map(|b| b.total.cents())
            .max()
            .unwrap_or(0)
            .max(1) as f64;
        let slot = fwidth / self.data.len().max(1) as f64;
        let bars = self.data.iter().enumerate().map(|(i, bucket)| {
            let height = bucket.total.cents().max(0) as f64 / ymax * fheight;
            Rectangle::new()
                .set("x", i as f64 * slot + slot * 0.1)
                .set("y", fheight - height)
                .set("width", slot * 0.8)
                .set("height", height)
                .set("fill", BAR_FILL)
        });
        let yaxis = Line::new()
            .set("x1", 0.0)
            .set("x2", 0.0)
            .set("y1", 0.0)
            .set("y2", fheight)
            .set("stroke", "black")
            .set("stroke-width", stroke_width);
        let xaxis = Line::new()
            .set("x1", 0.0)
            .set("x2", fwidth)
            .set("y1", fheight)
            .set("y2", fheight)
            .set("stroke", "black")
            .set("stroke-width", stroke_width);
        let document = bars
            .fold(Document::new(), |doc, bar| doc.add(bar))
            .add(yaxis)
            .add(xaxis)
            .set(
                "viewBox",
                (-margin, -margin, fwidth + 2.0 * margin, fheight + 2.0 * margin),
            );
        svg::save(file, &document)
    }
}
