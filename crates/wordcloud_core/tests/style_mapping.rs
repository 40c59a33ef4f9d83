use wordcloud_core::{
    CloudConfig, ColorPalette, FontScale, FrameContent, MessageEvent, Viewport, WordCloudEngine,
    WordCloudSession,
};

fn session_with(texts: &[&str]) -> WordCloudSession {
    let mut session = WordCloudSession::default();
    for (index, text) in texts.iter().enumerate() {
        session.ingest(&MessageEvent::new(format!("m-{index}"), *text, 1));
    }
    session
}

#[test]
fn two_word_vocabulary_spans_the_full_font_range() {
    let session = session_with(&["cat cat", "dog"]);
    let snapshot = session.snapshot();
    let scale = FontScale::for_counts(&snapshot.global, &CloudConfig::default())
        .expect("non-empty counts");

    assert_eq!(scale.size(snapshot.global.get("dog")), 24.0);
    assert_eq!(scale.size(snapshot.global.get("cat")), 120.0);
}

#[test]
fn sizes_are_monotonic_and_bounded() {
    let scale = FontScale::new(3, 50, 40, 12.0, 96.0, None);
    let mut previous = 0.0;
    for count in 0..=60 {
        let size = scale.size(count);
        assert!(size >= previous, "count {count}");
        assert!((12.0..=96.0).contains(&size), "count {count} -> {size}");
        previous = size;
    }
    assert_eq!(scale.size(3), 12.0);
    assert_eq!(scale.size(50), 96.0);
}

#[test]
fn equal_counts_map_to_the_middle_of_the_range() {
    let scale = FontScale::new(4, 4, 3, 24.0, 120.0, None);
    assert_eq!(scale.size(4), 72.0);
}

#[test]
fn sparse_vocabulary_lifts_the_minimum_size() {
    let session = session_with(&["cat cat", "dog"]);
    let counts = session.snapshot().global;
    let plain = FontScale::for_counts(&counts, &CloudConfig::default()).expect("plain scale");
    let boosted = FontScale::for_counts(&counts, &CloudConfig::rich()).expect("boosted scale");

    assert_eq!(plain.effective_min(), 24.0);
    // threshold 20, two words: boost = 18 / 19 of the way to the midpoint.
    let expected = 24.0 + (72.0 - 24.0) * 18.0 / 19.0;
    assert!((boosted.effective_min() - expected).abs() < 1e-9);
    assert_eq!(boosted.size(1), boosted.effective_min());
    assert!((boosted.size(2) - 120.0).abs() < 1e-9);
}

#[test]
fn boost_vanishes_for_rich_vocabularies() {
    let words = (0..25).map(|index| format!("w{index}")).collect::<Vec<_>>();
    let joined = words.join(" ");
    let session = session_with(&[joined.as_str(), "w0"]);
    let scale = FontScale::for_counts(&session.snapshot().global, &CloudConfig::rich())
        .expect("scale");
    assert_eq!(scale.effective_min(), 24.0);
}

#[test]
fn dark_and_unparseable_palette_entries_fall_back() {
    let config = CloudConfig {
        palette: vec![
            "#000000".to_string(),
            "#ff0000".to_string(),
            "not-a-color".to_string(),
            "#123".to_string(),
            "#303030".to_string(),
            "#00ff00".to_string(),
        ],
        ..CloudConfig::default()
    };
    let palette = ColorPalette::from_config(&config);

    assert_eq!(palette.color_for(0), "#d3d3d3");
    assert_eq!(palette.color_for(1), "#ff0000");
    assert_eq!(palette.color_for(2), "#d3d3d3");
    // #123 expands to #112233: blue channel is above the threshold.
    assert_eq!(palette.color_for(3), "#112233");
    assert_eq!(palette.color_for(4), "#d3d3d3");
    assert_eq!(palette.color_for(5), "#00ff00");
    // Ordinals wrap around the palette.
    assert_eq!(palette.color_for(7), "#ff0000");
}

#[test]
fn word_color_is_stable_as_the_vocabulary_grows() {
    let mut engine = WordCloudEngine::new(CloudConfig::default(), Viewport::new(800.0, 600.0))
        .expect("engine");
    engine.ingest(&MessageEvent::new("m-1", "cat", 1));
    let first = cat_color(engine.render().map(|frame| &frame.content));

    engine.ingest(&MessageEvent::new("m-2", "dog dog dog bird", 2));
    engine.ingest(&MessageEvent::new("m-3", "/cloud", 3));
    engine.ingest(&MessageEvent::new("m-4", "cat fish", 4));
    let second = cat_color(engine.render().map(|frame| &frame.content));

    assert_eq!(first, second);
}

fn cat_color(content: Option<&FrameContent>) -> Vec<String> {
    let Some(FrameContent::Cloud { labels }) = content else {
        panic!("expected cloud content, got {content:?}");
    };
    let colors = labels
        .iter()
        .filter(|label| label.text == "cat")
        .map(|label| label.color.clone())
        .collect::<Vec<_>>();
    assert!(!colors.is_empty(), "cat was not placed");
    colors.into_iter().take(1).collect()
}
