//! Colored one-line status messages on stdout.

use ansi_term::{Colour, Style};
use std::fmt;

fn emit(style: Style, icon: &str, msg: impl fmt::Display) {
    println!("{} {msg}", style.paint(icon));
}

pub fn info<T: fmt::Display>(msg: T) {
    emit(Colour::Blue.bold(), "ℹ️", msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    emit(Colour::Green.bold(), "✅", msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    emit(Colour::Yellow.bold(), "⚠️", msg);
}
