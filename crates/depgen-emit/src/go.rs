use crate::emitter::Emitter;
use crate::EmitError;
use depgen_schema::{EmitConfig, ResolvedTable};

/// Emits a gofmt-clean Go source file declaring the table as a map literal.
#[derive(Debug, Clone)]
pub struct GoEmitter {
    generator: String,
    package: String,
    import_path: String,
    variable: String,
    map_type: String,
}

impl GoEmitter {
    pub fn new(config: &EmitConfig) -> Self {
        Self {
            generator: config.generator.clone(),
            package: config.package.clone(),
            import_path: config.import_path.clone(),
            variable: config.variable.clone(),
            map_type: config.map_type.clone(),
        }
    }

    pub fn render(&self, table: &ResolvedTable) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "// Code generated by \"{}\"; DO NOT EDIT\n\n",
            self.generator
        ));
        out.push_str(&format!("package {}\n\n", self.package));
        if !self.import_path.is_empty() {
            out.push_str("import (\n");
            out.push_str(&format!("\t{}\n", quote(&self.import_path)));
            out.push_str(")\n\n");
        }

        if table.is_empty() {
            out.push_str(&format!("var {} = {}{{}}\n", self.variable, self.map_type));
            return out;
        }

        out.push_str(&format!("var {} = {}{{\n", self.variable, self.map_type));
        for entry in table {
            out.push_str(&format!("\t{}: {{\n", quote(&entry.id)));
            out.push_str(&format!("\t\tId:      {},\n", quote(&entry.id)));
            out.push_str(&format!("\t\tVersion: {},\n", quote(&entry.version)));
            out.push_str(&format!("\t\tPath:    {},\n", quote(&entry.path)));
            out.push_str("\t},\n");
        }
        out.push_str("}\n");
        out
    }
}

impl Default for GoEmitter {
    fn default() -> Self {
        Self::new(&EmitConfig::default())
    }
}

impl Emitter for GoEmitter {
    fn name(&self) -> &str {
        "go"
    }

    fn emit(&self, table: &ResolvedTable) -> Result<Vec<u8>, EmitError> {
        Ok(self.render(table).into_bytes())
    }
}

/// Interpreted Go string literal, escaping the way `strconv.Quote` does for
/// ASCII control characters. Printable non-ASCII passes through.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
