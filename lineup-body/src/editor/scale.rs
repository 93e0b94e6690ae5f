/// Linear map between a value interval and a pixel interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn set_domain(&mut self, domain: [f64; 2]) {
        self.domain = domain;
    }

    /// Pixel position of `value`. A zero-width domain maps to the range
    /// start.
    pub fn apply(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Value at pixel position `px`. A zero-width range maps to the domain
    /// start.
    pub fn invert(&self, px: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (px - r0) / (r1 - r0) * (d1 - d0)
    }
}
