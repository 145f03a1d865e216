//! Property checks for format filtering and ordering

use clippers::extractor::{resolution_rank, select_formats, RawFormat};
use proptest::prelude::*;

fn codec() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("none".to_string())),
        Just(Some(String::new())),
        Just(Some("h264".to_string())),
        Just(Some("avc1.64001F".to_string())),
        Just(Some("mp4a.40.2".to_string())),
    ]
}

fn resolution() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("audio only".to_string())),
        (1u32..5000).prop_map(|h| Some(format!("{h}p"))),
        (1u32..8000, 1u32..5000).prop_map(|(w, h)| Some(format!("{w}x{h}"))),
    ]
}

fn raw_formats() -> impl Strategy<Value = Vec<RawFormat>> {
    prop::collection::vec((resolution(), codec(), codec()), 0..40).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (resolution, vcodec, acodec))| RawFormat {
                format_id: i.to_string(),
                resolution,
                vcodec,
                acodec,
                ..Default::default()
            })
            .collect()
    })
}

fn has_codec(codec: &Option<String>) -> bool {
    matches!(codec.as_deref(), Some(c) if !c.is_empty() && c != "none")
}

proptest! {
    #[test]
    fn selected_formats_are_all_muxed(raw in raw_formats()) {
        for format in select_formats(&raw) {
            prop_assert!(has_codec(&format.vcodec), "{:?}", format);
            prop_assert!(has_codec(&format.acodec), "{:?}", format);
        }
    }

    #[test]
    fn no_muxed_format_is_dropped(raw in raw_formats()) {
        let expected = raw
            .iter()
            .filter(|f| has_codec(&f.vcodec) && has_codec(&f.acodec))
            .count();
        prop_assert_eq!(select_formats(&raw).len(), expected);
    }

    #[test]
    fn ranks_never_increase(raw in raw_formats()) {
        let ranks: Vec<u64> = select_formats(&raw)
            .iter()
            .map(|f| resolution_rank(f.resolution.as_deref()))
            .collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] >= w[1]), "{:?}", ranks);
    }

    #[test]
    fn equal_ranks_keep_input_order(raw in raw_formats()) {
        let selected = select_formats(&raw);
        for pair in selected.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if resolution_rank(a.resolution.as_deref()) == resolution_rank(b.resolution.as_deref()) {
                let a_pos: usize = a.format_id.parse().unwrap();
                let b_pos: usize = b.format_id.parse().unwrap();
                prop_assert!(a_pos < b_pos, "{} before {}", a.format_id, b.format_id);
            }
        }
    }
}
