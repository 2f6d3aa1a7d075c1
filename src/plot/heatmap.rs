use super::palette::Palette;
use crate::Utility;
use crate::tournament::Table;
use crate::tournament::order;
use plotters::prelude::*;
use plotters::style::text_anchor::HPos;
use plotters::style::text_anchor::Pos;
use plotters::style::text_anchor::VPos;
use std::path::Path;

const GUTTER: i32 = 150;
const HEADER: i32 = 110;

#[derive(Debug, Clone)]
pub struct HeatmapOptions {
    pub palette: Palette,
    /// annotation precision
    pub decimals: usize,
    /// cell edge in pixels
    pub cell: u32,
    pub title: Option<String>,
    /// columns are game tags rather than algorithm tags
    pub game_cols: bool,
    /// fixed color domain; data extrema otherwise
    pub bounds: Option<(Utility, Utility)>,
    /// anchor the palette midpoint on this value
    pub center: Option<Utility>,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            palette: Palette::Diverging,
            decimals: 2,
            cell: 72,
            title: None,
            game_cols: false,
            bounds: None,
            center: None,
        }
    }
}

/// Render a tournament table as an annotated heatmap PNG, `avg` row
/// and column appended, axes in canonical order, thick rules
/// separating the `avg` and `BR` lines.
pub fn heatmap(table: &Table, opts: &HeatmapOptions, path: &Path) -> anyhow::Result<()> {
    let prepared = match opts.game_cols {
        true => table.with_avg().sorted_by_game_cols(),
        false => table.with_avg().sorted(),
    };
    render(&prepared, opts, path)
}

/// Render the best-response-fraction transform of a tournament table:
/// color domain pinned to [0, 1], palette centered on the grand mean.
pub fn br_fraction_heatmap(table: &Table, opts: &HeatmapOptions, path: &Path) -> anyhow::Result<()> {
    let fraction = table.br_fraction()?;
    let prepared = match opts.game_cols {
        true => fraction.sorted_by_game_cols(),
        false => fraction.sorted(),
    };
    let opts = HeatmapOptions {
        bounds: Some((0.0, 1.0)),
        center: fraction.get("avg", "avg"),
        ..opts.clone()
    };
    render(&prepared, &opts, path)
}

/// Draw a fully prepared table (already averaged and sorted).
fn render(table: &Table, opts: &HeatmapOptions, path: &Path) -> anyhow::Result<()> {
    let cell = opts.cell as i32;
    let title_pad = if opts.title.is_some() { 44 } else { 0 };
    let width = (GUTTER + cell * table.cols().len() as i32) as u32;
    let height = (title_pad + HEADER + cell * table.rows().len() as i32) as u32;
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow::anyhow!("fill: {}", e))?;

    let (lo, hi) = opts.bounds.unwrap_or((table.min_element(), table.max_element()));
    let position = |value: Utility| -> f64 {
        match opts.center {
            Some(center) if center > lo && center < hi => {
                if value <= center {
                    0.5 * (value - lo) / (center - lo)
                } else {
                    0.5 + 0.5 * (value - center) / (hi - center)
                }
            }
            _ => (value - lo) / (hi - lo),
        }
    };

    if let Some(title) = &opts.title {
        let style = ("sans-serif", 24)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(
            title.clone(),
            (width as i32 / 2, title_pad / 2),
            style,
        ))
        .map_err(|e| anyhow::anyhow!("title: {}", e))?;
    }

    let top = title_pad + HEADER;
    for (i, row) in table.rows().iter().enumerate() {
        for (j, _) in table.cols().iter().enumerate() {
            let value = table.at(i, j);
            let x0 = GUTTER + j as i32 * cell;
            let y0 = top + i as i32 * cell;
            if value.is_nan() {
                root.draw(&Rectangle::new(
                    [(x0, y0), (x0 + cell, y0 + cell)],
                    RGBColor(225, 225, 225).filled(),
                ))
                .map_err(|e| anyhow::anyhow!("cell: {}", e))?;
                continue;
            }
            let at = position(value);
            root.draw(&Rectangle::new(
                [(x0, y0), (x0 + cell, y0 + cell)],
                opts.palette.color(at).filled(),
            ))
            .map_err(|e| anyhow::anyhow!("cell: {}", e))?;
            let ink = if opts.palette.dark_at(at) { WHITE } else { BLACK };
            let style = ("sans-serif", (opts.cell / 4).max(12) as i32)
                .into_font()
                .color(&ink)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new(
                format!("{:.*}", opts.decimals, value),
                (x0 + cell / 2, y0 + cell / 2),
                style,
            ))
            .map_err(|e| anyhow::anyhow!("annotation: {}", e))?;
        }
        let style = ("sans-serif", 16)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        root.draw(&Text::new(
            order::alg_label(row).to_string(),
            (GUTTER - 10, top + i as i32 * cell + cell / 2),
            style,
        ))
        .map_err(|e| anyhow::anyhow!("row label: {}", e))?;
    }

    for (j, col) in table.cols().iter().enumerate() {
        let label = match opts.game_cols {
            true => order::game_label(col, None),
            false => order::alg_label(col).to_string(),
        };
        let style = ("sans-serif", 16)
            .into_font()
            .color(&BLACK)
            .transform(FontTransform::Rotate270)
            .pos(Pos::new(HPos::Left, VPos::Center));
        root.draw(&Text::new(
            label,
            (GUTTER + j as i32 * cell + cell / 2, top - 10),
            style,
        ))
        .map_err(|e| anyhow::anyhow!("col label: {}", e))?;
    }

    let right = GUTTER + cell * table.cols().len() as i32;
    let bottom = top + cell * table.rows().len() as i32;
    for (i, row) in table.rows().iter().enumerate() {
        if row == "avg" || row == "BR" {
            let y = top + i as i32 * cell;
            root.draw(&PathElement::new(
                vec![(GUTTER, y), (right, y)],
                BLACK.stroke_width(3),
            ))
            .map_err(|e| anyhow::anyhow!("rule: {}", e))?;
        }
    }
    for (j, col) in table.cols().iter().enumerate() {
        if col == "avg" {
            let x = GUTTER + j as i32 * cell;
            root.draw(&PathElement::new(
                vec![(x, top), (x, bottom)],
                BLACK.stroke_width(3),
            ))
            .map_err(|e| anyhow::anyhow!("rule: {}", e))?;
        }
    }

    root.present().map_err(|e| anyhow::anyhow!("present: {}", e))?;
    Ok(())
}
