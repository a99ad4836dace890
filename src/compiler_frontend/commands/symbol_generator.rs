use rustc_hash::FxHashSet;

pub const GENERATED_VARIABLE_PREFIX: &str = "var_";

/// Hands out fresh variable names for one compile unit.
///
/// Names are `var_0`, `var_1`, ... or `var_<hint>0`, `var_<hint>1`, ... with a hint.
/// Every name from one generator is distinct,
/// and reserved names (the variables the template author uses) are skipped.
#[derive(Debug, Default)]
pub struct SymbolGenerator {
    counter: usize,
    reserved: FxHashSet<String>,
}

impl SymbolGenerator {
    pub fn new() -> Self {
        SymbolGenerator::default()
    }

    pub fn reserve(&mut self, name: &str) {
        self.reserved.insert(name.to_owned());
    }

    pub fn next(&mut self) -> String {
        self.next_with_hint("")
    }

    pub fn next_with_hint(&mut self, hint: &str) -> String {
        loop {
            let candidate = format!("{GENERATED_VARIABLE_PREFIX}{hint}{}", self.counter);
            self.counter += 1;

            if self.reserved.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
