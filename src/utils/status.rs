use crate::models::geometry::ImageSize;
use crate::overlay::Overlay;
use comfy_table::{Attribute, Cell, CellAlignment, Table};

pub fn catchpit_summary(overlay: &Overlay, image: ImageSize) -> Table {
    let blocked = overlay.blocked_count();
    let total = overlay.catchpits.len();
    let b = &overlay.bounds;

    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("Catchpits")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center),
            Cell::new("Blocked")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center),
            Cell::new("Image")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center),
            Cell::new("South-west")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center),
            Cell::new("North-east")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center),
        ])
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED);

    let blocked_cell = if blocked > 0 {
        Cell::new(format!("⚠️ {}", blocked))
    } else {
        Cell::new(blocked)
    };

    table.add_row(vec![
        Cell::new(total).set_alignment(CellAlignment::Center),
        blocked_cell.set_alignment(CellAlignment::Center),
        Cell::new(format!("{}x{}", image.width, image.height)).set_alignment(CellAlignment::Center),
        Cell::new(format!(
            "{:.6}, {:.6}",
            b.south_west.lat, b.south_west.lng
        )),
        Cell::new(format!(
            "{:.6}, {:.6}",
            b.north_east.lat, b.north_east.lng
        )),
    ]);

    table
}

pub fn print_catchpit_summary(overlay: &Overlay, image: ImageSize) {
    println!("\nCatchpit summary:\n{}\n", catchpit_summary(overlay, image));
}
