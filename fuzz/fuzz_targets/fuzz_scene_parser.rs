#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Malformed documents must produce errors, never panics
    if let Ok(xml) = std::str::from_utf8(data) {
        if let Ok(scene) = tricount::parser::parse_scene_xml(xml) {
            let _ = scene.own_triangle_count();
            let _ = scene.traversable_links().count();
        }
    }
});
