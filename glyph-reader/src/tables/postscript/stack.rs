//! Operand stack for charstring evaluation.

use types::Fixed;

use super::{Error, Number};

/// Maximum size of the operand stack.
///
/// See "Appendix B Type 2 Charstring Implementation Limits" at
/// <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=33>
pub const MAX_STACK: usize = 48;

/// Operand stack for charstrings.
///
/// Entries are either 32-bit integers or 16.16 fixed point values. Values
/// are stored in parallel arrays holding the raw bits and a flag marking the
/// fixed point entries, and are converted on demand when read.
///
/// Pushing onto a full stack drops the value.
pub struct Stack {
    values: [i32; MAX_STACK],
    value_is_fixed: [bool; MAX_STACK],
    top: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            values: [0; MAX_STACK],
            value_is_fixed: [false; MAX_STACK],
            top: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    pub fn len(&self) -> usize {
        self.top
    }

    pub fn verify_at_least_len(&self, len: usize) -> Result<(), Error> {
        if self.top < len {
            Err(Error::StackUnderflow)
        } else {
            Ok(())
        }
    }

    /// Returns true if the number of elements on the stack is odd.
    pub fn len_is_odd(&self) -> bool {
        self.top & 1 != 0
    }

    pub fn clear(&mut self) {
        self.top = 0;
    }

    pub fn push_i32(&mut self, value: i32) {
        self.push_impl(value, false);
    }

    pub fn push_fixed(&mut self, value: Fixed) {
        self.push_impl(value.to_bits(), true);
    }

    /// Pushes a number, storing reals as 16.16.
    pub fn push(&mut self, number: Number) {
        match number {
            Number::Integer(value) => self.push_i32(value),
            Number::Real(value) => self.push_fixed(Fixed::from_f64(value)),
        }
    }

    /// Returns the value at the given index as a 32-bit integer.
    ///
    /// Fixed point values are floored.
    pub fn get_i32(&self, index: usize) -> Result<i32, Error> {
        let (value, is_fixed) = self.get_raw(index)?;
        Ok(if is_fixed {
            Fixed::from_bits(value).to_i32()
        } else {
            value
        })
    }

    /// Returns the value at the given index as 16.16 fixed point.
    pub fn get_fixed(&self, index: usize) -> Result<Fixed, Error> {
        let (value, is_fixed) = self.get_raw(index)?;
        Ok(to_fixed(value, is_fixed))
    }

    /// Returns the value at the given index, preserving its type.
    pub fn get_number(&self, index: usize) -> Result<Number, Error> {
        let (value, is_fixed) = self.get_raw(index)?;
        Ok(if is_fixed {
            Number::Real(Fixed::from_bits(value).to_f64())
        } else {
            Number::Integer(value)
        })
    }

    pub fn pop_i32(&mut self) -> Result<i32, Error> {
        let (value, is_fixed) = self.pop()?;
        Ok(if is_fixed {
            Fixed::from_bits(value).to_i32()
        } else {
            value
        })
    }

    pub fn pop_number(&mut self) -> Result<Number, Error> {
        let (value, is_fixed) = self.pop()?;
        Ok(if is_fixed {
            Number::Real(Fixed::from_bits(value).to_f64())
        } else {
            Number::Integer(value)
        })
    }

    /// Returns an array of `N` 16.16 fixed point values starting at
    /// `first_index`.
    pub fn fixed_array<const N: usize>(&self, first_index: usize) -> Result<[Fixed; N], Error> {
        let end = first_index + N;
        if end > self.top {
            return Err(Error::StackUnderflow);
        }
        let mut result = [Fixed::ZERO; N];
        for ((dest, value), is_fixed) in result
            .iter_mut()
            .zip(&self.values[first_index..end])
            .zip(&self.value_is_fixed[first_index..end])
        {
            *dest = to_fixed(*value, *is_fixed);
        }
        Ok(result)
    }

    /// Removes the bottom element of the stack, returning it as 16.16.
    ///
    /// Used to strip the advance width that may precede the arguments of
    /// the first hint or path operator.
    pub fn take_first(&mut self) -> Result<Fixed, Error> {
        let first = self.get_fixed(0)?;
        self.values.copy_within(1..self.top, 0);
        self.value_is_fixed.copy_within(1..self.top, 0);
        self.top -= 1;
        Ok(first)
    }

    /// Exchanges the two topmost elements.
    pub fn exchange(&mut self) -> Result<(), Error> {
        self.verify_at_least_len(2)?;
        let (a, b) = (self.top - 2, self.top - 1);
        self.values.swap(a, b);
        self.value_is_fixed.swap(a, b);
        Ok(())
    }

    /// Duplicates the topmost element.
    pub fn duplicate(&mut self) -> Result<(), Error> {
        let top = self.top.checked_sub(1).ok_or(Error::StackUnderflow)?;
        let (value, is_fixed) = self.get_raw(top)?;
        self.push_impl(value, is_fixed);
        Ok(())
    }

    fn get_raw(&self, index: usize) -> Result<(i32, bool), Error> {
        if index >= self.top {
            return Err(Error::InvalidStackAccess(index));
        }
        Ok((self.values[index], self.value_is_fixed[index]))
    }

    fn push_impl(&mut self, value: i32, is_fixed: bool) {
        if self.top == MAX_STACK {
            log::trace!("operand stack is full; dropping {value:#x}");
            return;
        }
        self.values[self.top] = value;
        self.value_is_fixed[self.top] = is_fixed;
        self.top += 1;
    }

    /// Removes the topmost element, returning its raw bits and fixed flag.
    fn pop(&mut self) -> Result<(i32, bool), Error> {
        let top = self.top.checked_sub(1).ok_or(Error::StackUnderflow)?;
        let entry = (self.values[top], self.value_is_fixed[top]);
        self.top = top;
        Ok(entry)
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

fn to_fixed(value: i32, is_fixed: bool) -> Fixed {
    if is_fixed {
        Fixed::from_bits(value)
    } else {
        Fixed::from_i32(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop() {
        let mut stack = Stack::new();
        stack.push_i32(20);
        stack.push_fixed(Fixed::from_f64(42.42));
        assert!(!stack.len_is_odd());
        assert_eq!(
            stack.pop_number().unwrap(),
            Number::Real(Fixed::from_f64(42.42).to_f64())
        );
        assert_eq!(stack.pop_i32().unwrap(), 20);
        assert!(stack.is_empty());
        assert_eq!(stack.pop_i32(), Err(Error::StackUnderflow));
        assert_eq!(stack.pop_number(), Err(Error::StackUnderflow));
    }

    #[test]
    fn pop_reads_the_topmost_value() {
        let mut stack = Stack::new();
        stack.push_i32(7);
        assert_eq!(stack.pop_i32(), Ok(7));
        stack.push_i32(3);
        stack.push_fixed(Fixed::from_f64(-1.5));
        assert_eq!(stack.pop_i32(), Ok(-2));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop_number(), Ok(Number::Integer(3)));
    }

    #[test]
    fn fixed_converts_to_int_by_floor() {
        let mut stack = Stack::new();
        stack.push_fixed(Fixed::from_f64(-2.5));
        stack.push_fixed(Fixed::from_f64(7.75));
        assert_eq!(stack.get_i32(0).unwrap(), -3);
        assert_eq!(stack.get_i32(1).unwrap(), 7);
    }

    #[test]
    fn overflow_drops_values() {
        let mut stack = Stack::new();
        for i in 0..60 {
            stack.push_i32(i);
        }
        assert_eq!(stack.len(), MAX_STACK);
        assert_eq!(stack.pop_i32().unwrap(), MAX_STACK as i32 - 1);
    }

    #[test]
    fn take_first_shifts() {
        let mut stack = Stack::new();
        for i in [100, 1, 2] {
            stack.push_i32(i);
        }
        assert_eq!(stack.take_first().unwrap(), Fixed::from_i32(100));
        assert_eq!(
            stack.fixed_array::<2>(0).unwrap(),
            [Fixed::from_i32(1), Fixed::from_i32(2)]
        );
    }

    #[test]
    fn exchange_and_duplicate() {
        let mut stack = Stack::new();
        stack.push_i32(1);
        stack.push_fixed(Fixed::from_f64(0.5));
        stack.exchange().unwrap();
        stack.duplicate().unwrap();
        assert_eq!(stack.pop_number().unwrap(), Number::Integer(1));
        assert_eq!(stack.pop_number().unwrap(), Number::Integer(1));
        assert_eq!(stack.pop_number().unwrap(), Number::Real(0.5));
    }

    #[test]
    fn array_access_checks_bounds() {
        let mut stack = Stack::new();
        stack.push_i32(1);
        stack.push_i32(2);
        assert_eq!(
            stack.fixed_array::<2>(0).unwrap(),
            [Fixed::from_i32(1), Fixed::from_i32(2)]
        );
        assert_eq!(stack.fixed_array::<2>(1), Err(Error::StackUnderflow));
    }
}
