//! HTML for the carousel's DOM contract.
//!
//! The browser binding (feature `web`) and hand-written pages both rely on
//! this structure:
//!
//! ```text
//! div.carousel
//! ├── div.frame                 # fixed-size viewport, clips the tape
//! │   └── div.tape              # slides side by side, moved with translateX
//! │       ├── img.clone         # copy of the last slide
//! │       ├── img …             # the real slides
//! │       └── img.clone         # copy of the first slide
//! ├── button.previous-btn
//! ├── button.next-btn
//! └── div.controls
//!     ├── div.dots-box          # button.dot[data-index=i] per real slide
//!     └── button.play-btn       # pause icon while playing, play icon while paused
//! ```
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating,
//! so every interpolated value is escaped.

use crate::config::CarouselConfig;
use crate::slides::Slide;
use crate::track::{self, Track};
use maud::{DOCTYPE, Markup, html};

const CSS_STATIC: &str = include_str!("../static/carousel.css");

/// Accessible label of dot `index` (0-based).
pub fn dot_label(index: usize) -> String {
    format!("Picture {}", index + 1)
}

/// Accessible label of the play/pause button for the given state.
pub fn play_label(playing: bool) -> &'static str {
    if playing {
        "Pause slideshow"
    } else {
        "Start slideshow"
    }
}

/// The play/pause affordance: a pause icon while playing, a play icon otherwise.
pub fn play_icon(playing: bool) -> Markup {
    html! {
        svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"
            fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round"
            stroke-linejoin="round" {
            @if playing {
                rect x="6" y="4" width="4" height="16" {}
                rect x="14" y="4" width="4" height="16" {}
            } @else {
                polygon points="5 3 19 12 5 21 5 3" {}
            }
        }
    }
}

/// Dot buttons for `count` slides, the first one highlighted.
pub fn render_dots(count: usize) -> Markup {
    html! {
        @for i in 0..count {
            button.dot.dot-filled[i == 0] type="button" data-index=(i) aria-label=(dot_label(i)) {}
        }
    }
}

/// The carousel element, clones and dots included.
pub fn render_carousel(slides: &[Slide], config: &CarouselConfig) -> Markup {
    let track = Track::new(slides.len());
    let extended = track::extend(slides);

    html! {
        div.carousel {
            div.frame {
                div.tape {
                    @for (position, slide) in extended.iter().enumerate() {
                        @if track.is_some_and(|t| t.is_clone(position)) {
                            img.clone src=(slide.src) alt="" aria-hidden="true" draggable="false";
                        } @else {
                            img src=(slide.src) alt=(slide.alt) draggable="false"
                                loading=[(position > 1).then_some("lazy")];
                        }
                    }
                }
            }
            button.previous-btn type="button" aria-label="Previous picture" { "‹" }
            button.next-btn type="button" aria-label="Next picture" { "›" }
            div.controls {
                div.dots-box {
                    (render_dots(slides.len()))
                }
                button.play-btn type="button" aria-label=(play_label(config.autoplay.enabled)) {
                    (play_icon(config.autoplay.enabled))
                }
            }
        }
    }
}

/// A standalone HTML document showing the carousel.
pub fn render_page(title: &str, slides: &[Slide], config: &CarouselConfig) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS_STATIC) }
            }
            body {
                main {
                    (render_carousel(slides, config))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::slides;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn dot_labels_are_one_based() {
        assert_eq!(dot_label(0), "Picture 1");
        assert_eq!(dot_label(4), "Picture 5");
    }

    #[test]
    fn play_icon_shows_pause_bars_while_playing() {
        let html = play_icon(true).into_string();
        assert_eq!(count(&html, "<rect"), 2);
        assert!(!html.contains("<polygon"));
    }

    #[test]
    fn play_icon_shows_triangle_while_paused() {
        let html = play_icon(false).into_string();
        assert!(html.contains(r#"points="5 3 19 12 5 21 5 3""#));
        assert!(!html.contains("<rect"));
    }

    #[test]
    fn carousel_has_contract_classes() {
        let html = render_carousel(&slides(&["010-a.jpg", "020-b.jpg"]), &CarouselConfig::default())
            .into_string();
        for class in ["carousel", "frame", "tape", "previous-btn", "next-btn", "dots-box", "play-btn"] {
            assert!(html.contains(&format!(r#"class="{class}""#)), "missing {class}");
        }
    }

    #[test]
    fn tape_is_wrapped_in_clones() {
        let html = render_carousel(
            &slides(&["010-a.jpg", "020-b.jpg", "030-c.jpg"]),
            &CarouselConfig::default(),
        )
        .into_string();
        assert_eq!(count(&html, "<img"), 5);
        assert_eq!(count(&html, r#"class="clone""#), 2);
        let first_img = html.find("<img").unwrap();
        let c_pos = html.find("030-c.jpg").unwrap();
        let a_pos = html.find("010-a.jpg").unwrap();
        // The prepended clone shows the last slide
        assert!(c_pos > first_img && c_pos < a_pos);
        // The appended clone shows the first slide
        assert!(html.rfind("010-a.jpg").unwrap() > html.rfind("030-c.jpg").unwrap());
    }

    #[test]
    fn single_slide_is_its_own_clone_on_both_ends() {
        let html = render_carousel(&slides(&["010-a.jpg"]), &CarouselConfig::default())
            .into_string();
        assert_eq!(count(&html, "<img"), 3);
        assert_eq!(count(&html, r#"class="clone""#), 2);
        assert_eq!(count(&html, "010-a.jpg"), 3);
        assert!(!html.contains(r#"loading="lazy""#));
    }

    #[test]
    fn no_slides_renders_empty_tape() {
        let html = render_carousel(&[], &CarouselConfig::default()).into_string();
        assert!(html.contains(r#"<div class="tape"></div>"#));
        assert_eq!(count(&html, "data-index"), 0);
    }

    #[test]
    fn one_dot_per_real_slide_first_filled() {
        let html = render_carousel(
            &slides(&["010-a.jpg", "020-b.jpg", "030-c.jpg"]),
            &CarouselConfig::default(),
        )
        .into_string();
        assert_eq!(count(&html, r#"data-index=""#), 3);
        assert_eq!(count(&html, "dot-filled"), 1);
        assert!(html.contains(r#"class="dot dot-filled""#));
        assert!(html.contains(r#"data-index="0""#));
        assert!(html.contains(r#"aria-label="Picture 3""#));
    }

    #[test]
    fn paused_config_renders_play_icon() {
        let mut config = CarouselConfig::default();
        config.autoplay.enabled = false;
        let html = render_carousel(&slides(&["010-a.jpg"]), &config).into_string();
        assert!(html.contains("<polygon"));
        assert!(html.contains("Start slideshow"));
    }

    #[test]
    fn alt_text_is_escaped() {
        let mut list = slides(&["010-a.jpg"]);
        list[0].alt = "<script>".to_string();
        let html = render_carousel(&list, &CarouselConfig::default()).into_string();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn page_includes_doctype_and_css() {
        let html = render_page("Harbour", &slides(&["010-a.jpg"]), &CarouselConfig::default())
            .into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Harbour</title>"));
        assert!(html.contains(".dot-filled"));
    }
}
