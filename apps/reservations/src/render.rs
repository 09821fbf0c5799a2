use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use client_core::ListState;
use shared::protocol::Reservation;

const HEADERS: [&str; 4] = ["Reservation ID", "User ID", "Book ID", "Reserved At"];

/// `dd/mm/yyyy`, as the reservation list has always shown dates.
pub fn reserved_on(at: &DateTime<Utc>) -> String {
    at.format("%d/%m/%Y").to_string()
}

pub fn page_table(state: &ListState) -> String {
    let rows: Vec<[String; 4]> = state
        .items()
        .iter()
        .map(|r| {
            [
                r.id.to_string(),
                r.user_id.to_string(),
                r.book_id.to_string(),
                reserved_on(&r.reserved_at),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    if rows.is_empty() {
        out.push_str("(no reservations)\n");
    }
    if let Some(cursor) = state.cursor() {
        let _ = writeln!(out, "next paging state: {cursor}");
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn detail(reservation: &Reservation) -> String {
    let mut out = String::from("Reservation Details\n");
    let _ = writeln!(out, "Reservation ID: {}", reservation.id);
    let _ = writeln!(out, "User ID: {}", reservation.user_id);
    let _ = writeln!(out, "Book ID: {}", reservation.book_id);
    let _ = writeln!(out, "Reserved At: {}", reserved_on(&reservation.reserved_at));
    if let Some(book) = &reservation.book {
        out.push_str("Book Details\n");
        let _ = writeln!(out, "Title: {}", book.title);
        let _ = writeln!(out, "Author: {}", book.author);
        let _ = writeln!(out, "Category: {}", book.category);
        if let Some(image_url) = &book.image_url {
            let _ = writeln!(out, "Image: {image_url}");
        }
    }
    out
}
