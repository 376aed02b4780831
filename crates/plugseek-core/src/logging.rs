//! Log subscriber set-up driven by wildcard channel filters.
//!
//! An event's channel is its `tracing` target with `::` replaced by `.`, so
//! events from `plugseek_core::discovery` belong to the channel
//! `plugseek_core.discovery`. When `RUST_LOG` is set it is applied on top of
//! the channel filters.

use tracing::Metadata;
use tracing_subscriber::filter::{filter_fn, FilterFn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use tracing::level_filters::LevelFilter;

use crate::channel_filter::ChannelFilterList;
use crate::error::{Error, Result};

/// Channel name for a `tracing` target.
pub fn channel_of(target: &str) -> String {
    target.replace("::", ".")
}

/// Per-layer filter that lets an event through when its channel allows the
/// event's level. Channels without a level use `default`.
pub fn channel_filter(
    filters: ChannelFilterList,
    default: LevelFilter,
) -> FilterFn<impl Fn(&Metadata<'_>) -> bool> {
    filter_fn(move |meta| {
        let setting = filters.resolve(&channel_of(meta.target()));
        setting.level_filter(default) >= *meta.level()
    })
}

/// Install a global fmt subscriber filtered by `filters`.
///
/// Panics if a global subscriber is already set; see [`try_init`].
pub fn init(filters: &ChannelFilterList, default: LevelFilter) {
    if let Err(e) = try_init(filters, default) {
        panic!("{e}");
    }
}

/// Like [`init`], but returns an error when a global subscriber is already
/// set.
pub fn try_init(filters: &ChannelFilterList, default: LevelFilter) -> Result<()> {
    let env_filter = std::env::var_os(EnvFilter::DEFAULT_ENV)
        .and_then(|_| EnvFilter::try_from_default_env().ok());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(channel_filter(filters.clone(), default)),
        )
        .try_init()
        .map_err(|e| Error::LoggingInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_of() {
        assert_eq!(channel_of("plugseek_core::discovery::walker"), "plugseek_core.discovery.walker");
        assert_eq!(channel_of("app"), "app");
    }

    #[test]
    fn test_filtered_subscriber_scoped() {
        use std::sync::{Arc, Mutex};
        use tracing_subscriber::fmt::MakeWriter;

        #[derive(Clone, Default)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Capture {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        impl<'a> MakeWriter<'a> for Capture {
            type Writer = Capture;
            fn make_writer(&'a self) -> Self::Writer {
                self.clone()
            }
        }

        let filters = ChannelFilterList::from_entries([
            ("noisy.*", "disabled"),
            ("chatty", "verbose"),
        ]);
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_writer(capture.clone())
                .with_ansi(false)
                .with_filter(channel_filter(filters, LevelFilter::WARN)),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "noisy::thing", "dropped-disabled");
            tracing::trace!(target: "chatty", "kept-verbose");
            tracing::info!(target: "other", "dropped-default");
            tracing::warn!(target: "other", "kept-default");
        });

        let out = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(!out.contains("dropped-disabled"));
        assert!(out.contains("kept-verbose"));
        assert!(!out.contains("dropped-default"));
        assert!(out.contains("kept-default"));
    }
}
