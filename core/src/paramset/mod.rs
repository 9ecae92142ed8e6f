//! Parameter Sets

use crate::pbrt::*;
use std::collections::HashMap;
use std::fmt;

mod paramset_item;

// Re-export
pub use paramset_item::*;

/// A hashmap of parameter sets stored by name.
pub type ParamSetMap<T> = HashMap<String, ParamSetItem<T>>;

/// Stores parameter set items of different types in hashmaps.
#[derive(Clone, Debug)]
pub struct ParamSet {
    pub bools: ParamSetMap<bool>,
    pub ints: ParamSetMap<Int>,
    pub strings: ParamSetMap<String>,
}

/// Define a macro that can be used to generate a function for adding/replacing
/// parameter set item.
macro_rules! paramset_add {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&mut self, name: &str, values: &[$t]) {
            let n = String::from(name);
            self.$paramset.insert(n, ParamSetItem::new(values.to_vec()));
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a single item.
macro_rules! paramset_find_one {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str, default: $t) -> $t {
            let n = String::from(name);
            match self.$paramset.get(&n) {
                Some(param) => {
                    if param.values.len() == 1 {
                        param.values[0].clone()
                    } else {
                        default.clone()
                    }
                }
                None => default.clone(),
            }
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a list.
macro_rules! paramset_find {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str) -> Vec<$t> {
            let n = String::from(name);
            match self.$paramset.get(&n) {
                Some(param) => param.values.clone(),
                None => vec![],
            }
        }
    };
}

/// Define a macro that can be used to print parameter set items.
macro_rules! display_param {
    ($params: expr, $param_type: literal, $formatter: expr) => {
        let mut names: Vec<&String> = $params.keys().collect();
        names.sort();
        for name in names {
            write!($formatter, "\"{} {}\" {}\n", $param_type, name, $params[name])?;
        }
    };
}

impl ParamSet {
    /// Returns a new `ParamSet`.
    pub fn new() -> Self {
        Self {
            bools: HashMap::new(),
            ints: HashMap::new(),
            strings: HashMap::new(),
        }
    }

    paramset_find_one!(find_one_int, Int, ints);
    paramset_find!(find_int, Int, ints);
    paramset_add!(add_int, Int, ints);

    paramset_find_one!(find_one_bool, bool, bools);
    paramset_add!(add_bool, bool, bools);

    paramset_find_one!(find_one_string, String, strings);
    paramset_add!(add_string, String, strings);
}

impl Default for ParamSet {
    /// Returns the "default value" for `ParamSet`.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParamSet {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_param!(self.bools, "bool", f);
        display_param!(self.ints, "integer", f);
        display_param!(self.strings, "string", f);
        Ok(())
    }
}
