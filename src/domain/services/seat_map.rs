use crate::domain::models::seat::SeatSpec;
use serde::Serialize;

pub const MAX_ROWS: i32 = 26;
pub const MAX_SECTION_WIDTH: i32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatRow {
    pub row: String,
    pub sections: Vec<Vec<String>>,
}

pub fn row_label(index: i32) -> String {
    char::from(b'A' + index as u8).to_string()
}

pub fn validate_layout(row_count: i32, sections: &[i32]) -> Result<(), String> {
    if row_count < 1 || row_count > MAX_ROWS {
        return Err(format!("Row count must be between 1 and {}", MAX_ROWS));
    }
    if sections.is_empty() {
        return Err("At least one seat section is required".to_string());
    }
    if sections.iter().any(|w| *w < 1 || *w > MAX_SECTION_WIDTH) {
        return Err(format!("Section widths must be between 1 and {}", MAX_SECTION_WIDTH));
    }
    Ok(())
}

/// Rows of seat codes, front row first. Seat numbers run continuously across
/// sections, so `[4, 8, 4]` yields `A1..A4 | A5..A12 | A13..A16`.
pub fn layout(row_count: i32, sections: &[i32]) -> Vec<SeatRow> {
    (0..row_count.clamp(0, MAX_ROWS))
        .map(|r| {
            let label = row_label(r);
            let mut next = 1;
            let sections = sections
                .iter()
                .map(|width| {
                    let codes = (next..next + width).map(|n| format!("{}{}", label, n)).collect();
                    next += width;
                    codes
                })
                .collect();
            SeatRow { row: label, sections }
        })
        .collect()
}

pub fn seat_specs(row_count: i32, sections: &[i32]) -> Vec<SeatSpec> {
    layout(row_count, sections)
        .into_iter()
        .flat_map(|row| {
            let label = row.row;
            row.sections
                .into_iter()
                .flatten()
                .enumerate()
                .map(move |(i, code)| SeatSpec {
                    code,
                    row_label: label.clone(),
                    seat_number: i as i32 + 1,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_numbers_continue_across_sections() {
        let rows = layout(2, &[2, 3]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, "A");
        assert_eq!(rows[0].sections, vec![vec!["A1", "A2"], vec!["A3", "A4", "A5"]]);
        assert_eq!(rows[1].sections[1], vec!["B3", "B4", "B5"]);
    }

    #[test]
    fn test_seat_specs_match_capacity() {
        let specs = seat_specs(3, &[4, 8, 4]);
        assert_eq!(specs.len(), 48);
        assert_eq!(specs[0], SeatSpec { code: "A1".into(), row_label: "A".into(), seat_number: 1 });
        assert_eq!(specs[47].code, "C16");
        assert_eq!(specs[47].seat_number, 16);
    }

    #[test]
    fn test_layout_is_deterministic() {
        assert_eq!(layout(5, &[3, 3]), layout(5, &[3, 3]));
    }

    #[test]
    fn test_validate_layout_bounds() {
        assert!(validate_layout(0, &[4]).is_err());
        assert!(validate_layout(27, &[4]).is_err());
        assert!(validate_layout(10, &[]).is_err());
        assert!(validate_layout(10, &[4, 0]).is_err());
        assert!(validate_layout(26, &[10, 10]).is_ok());
        assert_eq!(row_label(25), "Z");
    }
}
