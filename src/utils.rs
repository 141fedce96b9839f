/// [Cantor pairing function][cantor-pairing].
///
/// ```text
/// (a, b) -> (a + b) * (a + b + 1) / 2 + b
/// ```
///
/// Arithmetic wraps, so large operands still give a deterministic value
/// (which is all a cache index needs).
///
/// [cantor-pairing]: https://en.wikipedia.org/wiki/Pairing_function#Cantor_pairing_function
pub fn pairing_cantor(a: u64, b: u64) -> u64 {
    let s = a.wrapping_add(b);
    let t = if s % 2 == 0 {
        (s / 2).wrapping_mul(s.wrapping_add(1))
    } else {
        s.wrapping_mul(s.wrapping_add(1) / 2)
    };
    t.wrapping_add(b)
}

/// Pairing function for three `u64` values.
pub fn pairing3(a: u64, b: u64, c: u64) -> u64 {
    pairing_cantor(pairing_cantor(a, b), c)
}

/// Slot index for a two-operand key in a table of `size` slots.
#[inline]
pub fn pair_index(a: u64, b: u64, size: usize) -> usize {
    debug_assert!(size > 0);
    (pairing_cantor(a, b) % size as u64) as usize
}

/// Slot index for a three-operand key in a table of `size` slots.
#[inline]
pub fn triple_index(a: u64, b: u64, c: u64, size: usize) -> usize {
    debug_assert!(size > 0);
    (pairing3(a, b, c) % size as u64) as usize
}

/// Smallest prime that is `>= n`. Never smaller than 2.
///
/// Returns `None` if no such prime fits in a `usize`.
pub fn prime_gte(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Human readable size of `count` elements of `elem_size` bytes each,
/// e.g. `"1.5 KB"`.
pub fn human_size(count: usize, elem_size: usize) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    let bytes = count.saturating_mul(elem_size);
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
