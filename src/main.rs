// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Marksync - Main Entry Point
//!
//! A split-pane markdown editor: a WYSIWYG or markdown-source editor on the
//! left, a rendered or HTML-source preview on the right. Built with Rust and
//! egui.

mod app;
mod config;
mod editor;
mod error;
mod export;
mod files;
mod html;
mod markdown;
mod rich;
mod string_utils;
mod sync;
mod theme;
mod ui;

use app::MarksyncApp;
use config::load_config;
use log::info;

/// Application name constant.
const APP_NAME: &str = "Marksync";

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    let settings = load_config();
    let window_size = &settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([600.0, 400.0])
        .with_maximized(window_size.maximized);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(MarksyncApp::new(cc, settings)))),
    )
}
