//! Parameter Sets

use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;

/// A named parameter with one or more values.
#[derive(Clone, Debug)]
pub struct ParamSetItem<T> {
    /// The values.
    pub values: Vec<T>,

    /// Set once the parameter has been looked up.
    looked_up: Cell<bool>,
}

impl<T> ParamSetItem<T> {
    /// Create a new `ParamSetItem`.
    ///
    /// * `values` - The values.
    pub fn new(values: Vec<T>) -> Self {
        Self {
            values,
            looked_up: Cell::new(false),
        }
    }

    /// Returns true if the parameter has been looked up.
    pub fn looked_up(&self) -> bool {
        self.looked_up.get()
    }
}

/// A hashmap of parameter sets stored by name.
pub type ParamSetMap<T> = HashMap<String, ParamSetItem<T>>;

/// Stores parameter set items of different types in hashmaps.
#[derive(Clone, Default)]
pub struct ParamSet {
    pub bools: ParamSetMap<bool>,
    pub ints: ParamSetMap<Int>,
    pub floats: ParamSetMap<Float>,
    pub point3fs: ParamSetMap<Point3f>,
    pub spectra: ParamSetMap<Spectrum>,
    pub strings: ParamSetMap<String>,
}

/// Define a macro that can be used to generate a function for adding/replacing
/// parameter set item.
macro_rules! paramset_add {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&mut self, name: &str, values: &[$t]) {
            self.$paramset.insert(String::from(name), ParamSetItem::new(values.to_vec()));
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a single item.
macro_rules! paramset_find_one {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str, default: $t) -> $t {
            match self.$paramset.get(name) {
                Some(param) if param.values.len() == 1 => {
                    param.looked_up.set(true);
                    param.values[0].clone()
                }
                _ => default,
            }
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a list.
macro_rules! paramset_find {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str) -> &[$t] {
            match self.$paramset.get(name) {
                Some(param) => {
                    param.looked_up.set(true);
                    &param.values
                }
                None => &[],
            }
        }
    };
}

/// Define a macro that can be used to warn about parameters nobody looked up.
macro_rules! report_unused {
    ($params: expr, $param_type: literal) => {
        for (name, param) in $params.iter() {
            if !param.looked_up() {
                warn!("Parameter \"{} {}\" not used", $param_type, name);
            }
        }
    };
}

/// Define a macro that can be used to print parameter set items.
macro_rules! display_param {
    ($params: expr, $param_type: literal, $formatter: expr) => {
        for (name, param) in $params.iter() {
            write!($formatter, "\"{} {}\" [", $param_type, name)?;
            for (i, v) in param.values.iter().enumerate() {
                if i > 0 {
                    write!($formatter, " ")?;
                }
                write!($formatter, "{}", v)?;
            }
            writeln!($formatter, "]")?;
        }
    };
}

impl ParamSet {
    /// Returns a new `ParamSet`.
    pub fn new() -> Self {
        Self::default()
    }

    paramset_find_one!(find_one_int, Int, ints);
    paramset_find!(find_int, Int, ints);
    paramset_add!(add_int, Int, ints);

    paramset_find_one!(find_one_bool, bool, bools);
    paramset_find!(find_bool, bool, bools);
    paramset_add!(add_bool, bool, bools);

    paramset_find_one!(find_one_float, Float, floats);
    paramset_find!(find_float, Float, floats);
    paramset_add!(add_float, Float, floats);

    paramset_find_one!(find_one_point3f, Point3f, point3fs);
    paramset_find!(find_point3f, Point3f, point3fs);
    paramset_add!(add_point3f, Point3f, point3fs);

    paramset_find_one!(find_one_string, String, strings);
    paramset_find!(find_string, String, strings);
    paramset_add!(add_string, String, strings);

    paramset_find_one!(find_one_spectrum, Spectrum, spectra);
    paramset_find!(find_spectrum, Spectrum, spectra);
    paramset_add!(add_spectrum, Spectrum, spectra);

    /// Add/replace an RGB spectrum.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - RGB values in a linear slice. Trailing values that do not
    ///              form a full triple are ignored.
    pub fn add_rgb_spectrum(&mut self, name: &str, values: &[Float]) {
        if values.len() % 3 != 0 {
            warn!("RGB spectrum \"{}\" has {} values. Ignoring the excess.", name, values.len());
        }
        let spectra = values.chunks_exact(3).map(|c| Spectrum::from_rgb(c[0], c[1], c[2])).collect();
        self.spectra.insert(String::from(name), ParamSetItem::new(spectra));
    }

    /// Warns about every parameter that was never looked up.
    pub fn report_unused(&self) {
        report_unused!(self.bools, "bool");
        report_unused!(self.ints, "integer");
        report_unused!(self.floats, "float");
        report_unused!(self.point3fs, "point3");
        report_unused!(self.spectra, "rgb");
        report_unused!(self.strings, "string");
    }

    /// Clear all parameter set items.
    pub fn clear(&mut self) {
        self.bools.clear();
        self.ints.clear();
        self.floats.clear();
        self.point3fs.clear();
        self.spectra.clear();
        self.strings.clear();
    }
}

impl fmt::Display for ParamSet {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_param!(self.bools, "bool", f);
        display_param!(self.ints, "integer", f);
        display_param!(self.floats, "float", f);
        display_param!(self.point3fs, "point3", f);
        display_param!(self.spectra, "rgb", f);
        display_param!(self.strings, "string", f);
        Ok(())
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_one_falls_back_to_default() {
        let mut ps = ParamSet::new();
        ps.add_int("maxdepth", &[7]);
        ps.add_int("pixelbounds", &[0, 10, 0, 10]);
        assert_eq!(ps.find_one_int("maxdepth", 5), 7);
        assert_eq!(ps.find_one_int("missing", 5), 5);

        // Lists are not single values.
        assert_eq!(ps.find_one_int("pixelbounds", -1), -1);
        assert_eq!(ps.find_int("pixelbounds"), &[0, 10, 0, 10]);
        assert!(ps.find_int("missing").is_empty());
    }

    #[test]
    fn lookups_mark_parameters_used() {
        let mut ps = ParamSet::new();
        ps.add_float("rrthreshold", &[0.5]);
        ps.add_string("lightsamplestrategy", &[String::from("power")]);
        assert!(!ps.floats["rrthreshold"].looked_up());

        assert_eq!(ps.find_one_float("rrthreshold", 1.0), 0.5);
        assert!(ps.floats["rrthreshold"].looked_up());
        assert!(!ps.strings["lightsamplestrategy"].looked_up());
    }

    #[test]
    fn rgb_spectra_are_grouped_in_triples() {
        let mut ps = ParamSet::new();
        ps.add_rgb_spectrum("Kd", &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]);
        let spectra = ps.find_spectrum("Kd");
        assert_eq!(spectra.len(), 2);
        assert_eq!(spectra[1][2], 0.6);
    }

    #[test]
    fn display_lists_points() {
        let mut ps = ParamSet::new();
        ps.add_point3f("center", &[Point3f::new(1.0, 2.0, 0.5)]);
        assert_eq!(format!("{}", ps), "\"point3 center\" [(1, 2, 0.5)]\n");
    }
}
