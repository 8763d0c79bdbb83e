#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::*;

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_thousands() {
    assert_eq!(format_amount(dec!(1234567.89)), "1,234,567.89");
    assert_eq!(format_amount(dec!(1000)), "1,000.00");
    assert_eq!(format_amount(dec!(999.9)), "999.90");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-1234.5)), "-1,234.50");
    assert_eq!(format_amount(dec!(-0.01)), "-0.01");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(Decimal::ZERO), "0.00");
}

#[test]
fn test_format_signed() {
    assert_eq!(format_signed(dec!(750)), "+750.00");
    assert_eq!(format_signed(dec!(-250)), "-250.00");
    assert_eq!(format_signed(Decimal::ZERO), "0.00");
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string_unchanged() {
    assert_eq!(truncate("Food", 10), "Food");
    assert_eq!(truncate("Food", 4), "Food");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("Subscriptions", 8), "Subscri…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("anything", 0), "");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("Café con leche", 6), "Café …");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_and_follows() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..10 {
        scroll_down(&mut index, &mut scroll, 20, 5);
    }
    assert_eq!(index, 10);
    assert_eq!(scroll, 6);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (4, 0);
    scroll_down(&mut index, &mut scroll, 5, 10);
    assert_eq!(index, 4);
}

#[test]
fn test_scroll_up_clamps_at_zero() {
    let (mut index, mut scroll) = (0, 0);
    scroll_up(&mut index, &mut scroll);
    assert_eq!(index, 0);
    assert_eq!(scroll, 0);
}

#[test]
fn test_scroll_top_bottom() {
    let (mut index, mut scroll) = (7, 3);
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));

    scroll_to_bottom(&mut index, &mut scroll, 30, 10);
    assert_eq!((index, scroll), (29, 20));
}

#[test]
fn test_scroll_bottom_empty_list() {
    let (mut index, mut scroll) = (3, 1);
    scroll_to_bottom(&mut index, &mut scroll, 0, 10);
    // Untouched when there is nothing to select.
    assert_eq!((index, scroll), (3, 1));
}
