//! Arduino sketch generation for the MusicWithoutDelay library
//!
//! Each voice's RTTL string becomes a PROGMEM song with its own
//! instrument. The first instrument opens the shared output channel; the
//! rest attach to it.

/// Render a complete sketch embedding one song per ringtone string.
pub fn generate_sketch(ringtones: &[String]) -> String {
    let mut code = String::from("#include <MusicWithoutDelay.h>\n");

    for (i, rttl) in ringtones.iter().enumerate() {
        code.push_str(&format!(
            "const char song{}[] PROGMEM = \"{}\";\n",
            i, rttl
        ));
    }
    for i in 0..ringtones.len() {
        code.push_str(&format!(
            "MusicWithoutDelay instrument{}(song{});\n",
            i, i
        ));
    }

    code.push_str("\nvoid setup() {\n");
    for i in 0..ringtones.len() {
        if i == 0 {
            code.push_str("  instrument0.begin(CHA, TRIANGLE, ENVELOPE0, 0);\n");
        } else {
            code.push_str(&format!(
                "  instrument{}.begin(TRIANGLE, ENVELOPE0, 0);\n",
                i
            ));
        }
    }
    code.push_str("}\n\nvoid loop() {\n");
    for i in 0..ringtones.len() {
        code.push_str(&format!("  instrument{}.update();\n", i));
    }
    code.push_str("}\n");

    code
}
