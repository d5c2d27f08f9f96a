//! OTP Demo - Manual harness for the OTP field.
//!
//! Keys:
//! - digits, Backspace, Ctrl+V, paste - edit the code
//! - Enter - hide the keyboard
//! - Esc - clear the code and refocus
//! - F1 enabled, F2 read-only, F3 error, F4 helper, F5 mask
//! - F6 - put a sample code on the clipboard for Ctrl+V
//! - Tab / Shift+Tab - focus, Ctrl+C - quit
//!
//! Environment:
//! - `SPARK_OTP_LENGTH` - number of slots (default 6)
//! - `SPARK_OTP_THEME` - theme preset name (default terminal)
//! - `SPARK_OTP_LOG` - write tracing output to this file (`RUST_LOG` filters)
//!
//! Run with: cargo run --bin otp_demo

use std::cell::Cell;
use std::fs::File;
use std::rc::Rc;
use std::sync::Mutex;

use spark_signals::signal;
use spark_otp::primitives::{otp_field, MaskingTransform, OtpFieldProps, PropValue};
use spark_otp::state::{clipboard, keyboard};
use spark_otp::theme::{preset_names, set_theme_by_name, t};
use spark_otp::{layout, pipeline, Attr, ClipRect, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() -> Result<()> {
    let Ok(path) = std::env::var("SPARK_OTP_LOG") else {
        return Ok(());
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(File::create(path)?));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let length = std::env::var("SPARK_OTP_LENGTH")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(6);
    if let Ok(name) = std::env::var("SPARK_OTP_THEME") {
        if !set_theme_by_name(&name) {
            warn!(%name, available = ?preset_names(), "unknown theme");
        }
    }

    // Caller-owned state.
    let code = signal(String::new());
    let enabled = signal(true);
    let read_only = signal(false);
    let show_error = signal(false);
    let show_helper = signal(true);
    let masked = signal(true);
    let filled_count = Rc::new(Cell::new(0u32));

    let identity = MaskingTransform::identity();
    let obscured = MaskingTransform::obscured();

    let field = Rc::new(otp_field(OtpFieldProps {
        length,
        on_value_change: Some(Rc::new({
            let code = code.clone();
            move |v: &str| { code.set(v.to_string()); }
        })),
        on_filled: Some(Rc::new({
            let filled_count = filled_count.clone();
            move || {
                filled_count.set(filled_count.get() + 1);
                info!(count = filled_count.get(), "code complete");
            }
        })),
        error_message: Some(PropValue::getter({
            let show_error = show_error.clone();
            move || show_error.get().then(|| "Invalid code, try again".to_string())
        })),
        helper_text: Some(PropValue::getter({
            let show_helper = show_helper.clone();
            move || show_helper.get().then(|| "Enter the code we sent you".to_string())
        })),
        enabled: enabled.clone().into(),
        read_only: read_only.clone().into(),
        mask: PropValue::getter({
            let masked = masked.clone();
            move || if masked.get() { obscured.clone() } else { identity.clone() }
        }),
        request_focus: true,
        clear_focus_when_filled: true,
        ..OtpFieldProps::new(code.clone())
    })?);

    let toggle = |key: &'static str, flag: spark_signals::Signal<bool>| {
        keyboard::on_key(key, move || {
            flag.set(!flag.get());
            true
        })
    };
    let mut key_cleanups: Vec<Box<dyn FnOnce()>> = vec![
        Box::new(toggle("F1", enabled.clone())),
        Box::new(toggle("F2", read_only.clone())),
        Box::new(toggle("F3", show_error.clone())),
        Box::new(toggle("F4", show_helper.clone())),
        Box::new(toggle("F5", masked.clone())),
    ];
    key_cleanups.push(Box::new(keyboard::on_key("F6", move || {
        let sample: String = "4829137305".chars().cycle().take(length).collect();
        info!(code = %sample, "sample code copied");
        clipboard::copy(&sample);
        true
    })));
    key_cleanups.push(Box::new(keyboard::on_key("Escape", {
        let code = code.clone();
        let field = field.clone();
        move || {
            code.set(String::new());
            field.request_focus();
            true
        }
    })));

    let handle = pipeline::mount({
        let field = field.clone();
        let code = code.clone();
        let filled_count = filled_count.clone();
        move |buffer, now| {
            let theme = t();
            let area = buffer.area();
            buffer.fill(area, theme.background());

            let title = "Enter verification code";
            let title_x = area.width.saturating_sub(layout::string_width(title)) / 2;
            buffer.draw_text(title_x, 1, title, theme.primary(), Attr::BOLD, area);

            let field_area = ClipRect::new(0, 3, area.width, layout::FIELD_HEIGHT);
            if let Err(err) = field.render(buffer, field_area, now) {
                warn!(%err, "otp field render failed");
            }

            let status = format!(
                "value: {:<width$}  filled: {}  focus: {}  keyboard: {}",
                code.get(),
                filled_count.get(),
                if field.has_focus() { "yes" } else { "no" },
                if keyboard::keyboard_visible() { "shown" } else { "hidden" },
                width = length,
            );
            let status_y = 4 + layout::FIELD_HEIGHT;
            buffer.draw_text(2, status_y, &status, theme.text_muted(), Attr::NONE, area);
            buffer.draw_text(
                2,
                status_y + 1,
                "F1 enabled  F2 read-only  F3 error  F4 helper  F5 mask  F6 sample  Esc reset  Ctrl+C quit",
                theme.text_muted(),
                Attr::DIM,
                area,
            );
        }
    })?;

    let result = pipeline::run(&handle);
    handle.unmount();
    for cleanup in key_cleanups {
        cleanup();
    }
    result
}
