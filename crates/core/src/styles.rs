use crate::config::WidgetConfig;

pub const CONTAINER_CLASS: &str = "text-chat-widget";
pub const CHAT_FRAME_CLASS: &str = "chat-frame";
pub const BUTTON_CLASS: &str = "chat-button";
pub const CHAT_ICON_CLASS: &str = "chat-icon";
pub const ARROW_ICON_CLASS: &str = "arrow-icon";
pub const CLOSE_BUTTON_CLASS: &str = "close-button";

/// Id of the `<style>` node placed inside the chat frame document.
pub const FRAME_STYLE_ELEMENT_ID: &str = "text-chat-widget-frame-styles";

const EDGE_OFFSET_PX: u32 = 20;
const BUTTON_SIZE_PX: u32 = 60;
const FRAME_WIDTH_PX: u32 = 380;
const FRAME_HEIGHT_PX: u32 = 600;
const Z_INDEX: u32 = 2_147_483_000;

/// Builds the host-page stylesheet for one widget.
///
/// Layout, state-dependent visibility, icon swapping and the mobile
/// full-viewport override all key off the container's `collapsed`/`expanded`
/// class, so the block never needs rewriting after injection.
pub fn widget_stylesheet(config: &WidgetConfig) -> String {
    let edge = config.position.as_css_edge();
    let root = format!(".{CONTAINER_CLASS}");
    let frame = CHAT_FRAME_CLASS;
    let button = BUTTON_CLASS;
    let chat_icon = CHAT_ICON_CLASS;
    let arrow_icon = ARROW_ICON_CLASS;
    let close = CLOSE_BUTTON_CLASS;
    let frame_offset = BUTTON_SIZE_PX + EDGE_OFFSET_PX;

    format!(
        r#"
{root} {{
    position: fixed;
    bottom: {EDGE_OFFSET_PX}px;
    {edge}: {EDGE_OFFSET_PX}px;
    z-index: {Z_INDEX};
    font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
}}

{root} .{button} {{
    width: {BUTTON_SIZE_PX}px;
    height: {BUTTON_SIZE_PX}px;
    border: none;
    border-radius: 50%;
    background-color: #000000;
    color: #ffffff;
    cursor: pointer;
    display: flex;
    align-items: center;
    justify-content: center;
    box-shadow: 0 4px 14px rgba(0, 0, 0, 0.25);
    position: relative;
    padding: 0;
}}

{root} .{button} img {{
    width: 60%;
    height: 60%;
    object-fit: contain;
    border-radius: 50%;
}}

{root} .{frame} {{
    position: absolute;
    bottom: {frame_offset}px;
    {edge}: 0;
    width: {FRAME_WIDTH_PX}px;
    height: {FRAME_HEIGHT_PX}px;
    max-height: calc(100vh - {max_height_gap}px);
    border-radius: 16px;
    overflow: hidden;
    background: #ffffff;
    box-shadow: 0 8px 32px rgba(0, 0, 0, 0.2);
    opacity: 0;
    visibility: hidden;
    transform: translateY(12px);
    transition: opacity 0.2s ease, transform 0.2s ease, visibility 0.2s;
}}

{root}.expanded .{frame} {{
    opacity: 1;
    visibility: visible;
    transform: translateY(0);
}}

{root} .{frame} iframe {{
    width: 100%;
    height: 100%;
    border: none;
    display: block;
}}

{root}.collapsed .{arrow_icon},
{root}.expanded .{chat_icon} {{
    display: none;
}}

{root}.collapsed .{chat_icon},
{root}.expanded .{arrow_icon} {{
    display: flex;
    align-items: center;
    justify-content: center;
    width: 100%;
    height: 100%;
}}

{root} .{close} {{
    display: none;
    position: absolute;
    top: 12px;
    right: 12px;
    width: 36px;
    height: 36px;
    border: none;
    border-radius: 50%;
    background: rgba(0, 0, 0, 0.6);
    color: #ffffff;
    font-size: 22px;
    line-height: 36px;
    cursor: pointer;
    z-index: 1;
    align-items: center;
    justify-content: center;
}}

@media (max-width: 768px), (hover: none) {{
    {root}.expanded .{frame} {{
        position: fixed;
        top: 0;
        left: 0;
        right: 0;
        bottom: 0;
        width: 100vw;
        height: 100vh;
        height: 100dvh;
        max-height: none;
        border-radius: 0;
        transform: none;
    }}

    {root}.expanded .{close} {{
        display: flex;
    }}
}}

@media (min-width: 769px) {{
    {root} .{close} {{
        display: none !important;
    }}
}}
"#,
        max_height_gap = frame_offset + 2 * EDGE_OFFSET_PX,
    )
}

/// CSS delivered into the chat frame so the embedded app fills its container.
pub fn frame_content_styles() -> &'static str {
    r#"
html, body {
    margin: 0 !important;
    padding: 0 !important;
    width: 100% !important;
    height: 100% !important;
    overflow: hidden;
    background: transparent;
}

body > div:first-child,
#root,
#__next {
    width: 100% !important;
    height: 100% !important;
    max-width: none !important;
    max-height: none !important;
}
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Position;

    fn stylesheet_for(position: Position) -> String {
        widget_stylesheet(&WidgetConfig {
            position,
            ..WidgetConfig::default()
        })
    }

    #[test]
    fn button_edge_follows_position() {
        let right = stylesheet_for(Position::Right);
        assert!(right.contains("right: 20px;"));
        assert!(!right.contains("left: 20px;"));

        let left = stylesheet_for(Position::Left);
        assert!(left.contains("left: 20px;"));
        assert!(!left.contains("right: 20px;"));
    }

    #[test]
    fn collapsed_frame_is_hidden_until_expanded() {
        let css = stylesheet_for(Position::Right);
        let frame_rule = css
            .find(".text-chat-widget .chat-frame {")
            .map(|start| &css[start..])
            .and_then(|tail| tail.find('}').map(|end| &tail[..end]));

        let Some(frame_rule) = frame_rule else {
            panic!("frame rule missing from stylesheet");
        };
        assert!(frame_rule.contains("opacity: 0;"));
        assert!(frame_rule.contains("visibility: hidden;"));
        assert!(css.contains(".text-chat-widget.expanded .chat-frame {"));
    }

    #[test]
    fn mobile_override_fills_dynamic_viewport() {
        let css = stylesheet_for(Position::Right);
        assert!(css.contains("@media (max-width: 768px), (hover: none)"));
        assert!(css.contains("width: 100vw;"));
        assert!(css.contains("height: 100dvh;"));
        assert!(css.contains("border-radius: 0;"));
        assert!(css.contains("@media (min-width: 769px)"));
    }

    #[test]
    fn icon_swap_is_keyed_on_state_class() {
        let css = stylesheet_for(Position::Right);
        assert!(css.contains(".text-chat-widget.collapsed .arrow-icon,"));
        assert!(css.contains(".text-chat-widget.expanded .chat-icon {"));
    }
}
