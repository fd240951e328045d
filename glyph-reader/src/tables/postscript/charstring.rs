//! Evaluation of Type 2 charstrings.
//!
//! See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf>

use super::{index::subr_bias, number::parse_int, Error, Index, Number, Stack};
use crate::{types::Fixed, Cursor, FontData};

/// Maximum nesting depth for subroutine calls.
///
/// See "Appendix B Type 2 Charstring Implementation Limits" at
/// <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=33>
pub const NESTING_DEPTH_LIMIT: u32 = 10;

/// Number of slots in the transient array used by `put` and `get`.
pub const TRANSIENT_ARRAY_LEN: usize = 32;

/// Seed for the `random` operator. Each evaluation restarts the sequence so
/// that output is reproducible.
const RANDOM_SEED: u32 = 0x2545_F491;

/// Trait for processing commands resulting from charstring evaluation.
///
/// During processing, the path construction operators (see "4.1 Path
/// Construction Operators" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=15>)
/// are simplified into the basic move, line, curve and close commands, all
/// in absolute coordinates.
///
/// This also has optional callbacks for processing hint operators. See "4.3
/// Hint Operators" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=21>
/// for more detail.
#[allow(unused_variables)]
pub trait CommandSink {
    // Path construction operators.
    fn move_to(&mut self, x: Fixed, y: Fixed);
    fn line_to(&mut self, x: Fixed, y: Fixed);
    fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed);
    fn close(&mut self);
    // Hint operators.
    /// Horizontal stem hint from `y` to `y + dy`.
    fn hstem(&mut self, y: Fixed, dy: Fixed) {}
    /// Vertical stem hint from `x` to `x + dx`.
    fn vstem(&mut self, x: Fixed, dx: Fixed) {}
    /// Bitmask defining the hints that should be made active for the
    /// commands that follow.
    fn hint_mask(&mut self, mask: &[u8]) {}
    /// Bitmask defining the counter hints that should be made active for the
    /// commands that follow.
    fn counter_mask(&mut self, mask: &[u8]) {}
}

/// Operators that are recognized but have no effect when evaluated.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UnimplementedOperator {
    IfElse,
    Index,
    Roll,
}

/// Facts gathered while evaluating a charstring.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct EvaluationSummary {
    /// Difference between the glyph advance and `nominalWidthX`, if the
    /// charstring specified one.
    pub width: Option<Fixed>,
    pub hstem_count: usize,
    pub vstem_count: usize,
    /// Unimplemented operators in the order they were encountered.
    pub unimplemented: Vec<UnimplementedOperator>,
}

/// Evaluates the given charstring and emits the resulting commands to the
/// specified sink.
///
/// If the Private DICT associated with this charstring contains local
/// subroutines, then the `subrs` index must be provided, otherwise
/// `Error::MissingSubroutines` will be returned if a callsubr operator
/// is present.
///
/// The `charstring_type` comes from the Top DICT and selects the subroutine
/// bias.
pub fn evaluate<'a>(
    charstring_data: &'a [u8],
    charstring_type: i32,
    global_subrs: Index<'a>,
    subrs: Option<Index<'a>>,
    sink: &mut impl CommandSink,
) -> Result<EvaluationSummary, Error> {
    let mut evaluator = Evaluator::new(charstring_type, global_subrs, subrs, sink);
    evaluator.evaluate(charstring_data)?;
    Ok(evaluator.summary)
}

/// What the interpreter loop should do after an operator.
enum Flow<'a> {
    Continue,
    Call(&'a [u8]),
    Return,
    End,
}

/// Transient state for evaluating a charstring.
struct Evaluator<'a, 's, S> {
    charstring_type: i32,
    global_subrs: Index<'a>,
    subrs: Option<Index<'a>>,
    sink: &'s mut S,
    is_open: bool,
    have_read_width: bool,
    x: Fixed,
    y: Fixed,
    stack: Stack,
    transient: [Number; TRANSIENT_ARRAY_LEN],
    random_state: u32,
    summary: EvaluationSummary,
}

impl<'a, 's, S> Evaluator<'a, 's, S>
where
    S: CommandSink,
{
    fn new(
        charstring_type: i32,
        global_subrs: Index<'a>,
        subrs: Option<Index<'a>>,
        sink: &'s mut S,
    ) -> Self {
        Self {
            charstring_type,
            global_subrs,
            subrs,
            sink,
            is_open: false,
            have_read_width: false,
            x: Fixed::ZERO,
            y: Fixed::ZERO,
            stack: Stack::new(),
            transient: [Number::Integer(0); TRANSIENT_ARRAY_LEN],
            random_state: RANDOM_SEED,
            summary: EvaluationSummary::default(),
        }
    }

    /// Runs the interpreter loop.
    ///
    /// Subroutine calls push the caller's cursor onto an explicit frame
    /// stack. Running out of bytes in a subroutine behaves like `return`.
    fn evaluate(&mut self, charstring_data: &'a [u8]) -> Result<(), Error> {
        let mut frames: Vec<Cursor<'a>> = Vec::with_capacity(NESTING_DEPTH_LIMIT as usize);
        let mut cursor = FontData::new(charstring_data).cursor();
        loop {
            if cursor.remaining_bytes() == 0 {
                match frames.pop() {
                    Some(caller) => {
                        cursor = caller;
                        continue;
                    }
                    None => break,
                }
            }
            let b0 = cursor.read::<u8>()?;
            match b0 {
                // See "3.2 Charstring Number Encoding" <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=12>
                28 | 32..=254 => self.stack.push_i32(parse_int(&mut cursor, b0)?),
                255 => self
                    .stack
                    .push_fixed(Fixed::from_bits(cursor.read::<i32>()?)),
                _ => {
                    let operator = Operator::read(&mut cursor, b0)?;
                    match self.evaluate_operator(operator, &mut cursor)? {
                        Flow::Continue => {}
                        Flow::Call(subr_data) => {
                            if frames.len() as u32 >= NESTING_DEPTH_LIMIT {
                                return Err(Error::CharstringNestingDepthLimitExceeded);
                            }
                            let callee = FontData::new(subr_data).cursor();
                            frames.push(std::mem::replace(&mut cursor, callee));
                        }
                        Flow::Return => match frames.pop() {
                            Some(caller) => cursor = caller,
                            None => break,
                        },
                        Flow::End => break,
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolves the advance width on the first hint, moveto or endchar
    /// operator.
    ///
    /// If `has_width` is true, the bottom stack element is the width and is
    /// removed.
    fn read_width(&mut self, has_width: bool) -> Result<(), Error> {
        if !self.have_read_width {
            self.have_read_width = true;
            if has_width {
                self.summary.width = Some(self.stack.take_first()?);
            }
        }
        Ok(())
    }

    /// Emits stem hints for all pairs on the stack.
    fn stems(&mut self, is_horizontal: bool) -> Result<(), Error> {
        let mut u = Fixed::ZERO;
        let mut i = 0;
        while i + 2 <= self.stack.len() {
            let [du, dv] = self.stack.fixed_array::<2>(i)?;
            u += du;
            let v = u + dv;
            if is_horizontal {
                self.sink.hstem(u, v);
            } else {
                self.sink.vstem(u, v);
            }
            u = v;
            i += 2;
        }
        let count = self.stack.len() / 2;
        if is_horizontal {
            self.summary.hstem_count += count;
        } else {
            self.summary.vstem_count += count;
        }
        self.stack.clear();
        Ok(())
    }

    fn open_subpath(&mut self) {
        if !self.is_open {
            self.is_open = true;
        } else {
            self.sink.close();
        }
    }

    /// Evaluates a single charstring operator.
    fn evaluate_operator(
        &mut self,
        operator: Operator,
        cursor: &mut Cursor<'a>,
    ) -> Result<Flow<'a>, Error> {
        use Operator::*;
        match operator {
            // The "flex" operators may describe either two curves or a
            // straight line depending on a flex depth parameter. We always
            // emit the two curves.
            // Spec: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=18>
            Flex => {
                let args = self.stack.fixed_array::<12>(0)?;
                let dx1 = self.x + args[0];
                let dy1 = self.y + args[1];
                let dx2 = dx1 + args[2];
                let dy2 = dy1 + args[3];
                let dx3 = dx2 + args[4];
                let dy3 = dy2 + args[5];
                let dx4 = dx3 + args[6];
                let dy4 = dy3 + args[7];
                let dx5 = dx4 + args[8];
                let dy5 = dy4 + args[9];
                self.x = dx5 + args[10];
                self.y = dy5 + args[11];
                self.sink.curve_to(dx1, dy1, dx2, dy2, dx3, dy3);
                self.sink.curve_to(dx4, dy4, dx5, dy5, self.x, self.y);
                self.stack.clear();
            }
            HFlex => {
                let args = self.stack.fixed_array::<7>(0)?;
                let dx1 = self.x + args[0];
                let dy1 = self.y;
                let dx2 = dx1 + args[1];
                let dy2 = dy1 + args[2];
                let dx3 = dx2 + args[3];
                let dx4 = dx3 + args[4];
                let dx5 = dx4 + args[5];
                self.x = dx5 + args[6];
                self.sink.curve_to(dx1, dy1, dx2, dy2, dx3, dy2);
                self.sink.curve_to(dx4, dy2, dx5, self.y, self.x, self.y);
                self.stack.clear();
            }
            HFlex1 => {
                let args = self.stack.fixed_array::<9>(0)?;
                let dx1 = self.x + args[0];
                let dy1 = self.y + args[1];
                let dx2 = dx1 + args[2];
                let dy2 = dy1 + args[3];
                let dx3 = dx2 + args[4];
                let dx4 = dx3 + args[5];
                let dx5 = dx4 + args[6];
                let dy5 = dy2 + args[7];
                self.x = dx5 + args[8];
                self.sink.curve_to(dx1, dy1, dx2, dy2, dx3, dy2);
                self.sink.curve_to(dx4, dy2, dx5, dy5, self.x, self.y);
                self.stack.clear();
            }
            Flex1 => {
                let args = self.stack.fixed_array::<11>(0)?;
                let dx1 = self.x + args[0];
                let dy1 = self.y + args[1];
                let dx2 = dx1 + args[2];
                let dy2 = dy1 + args[3];
                let dx3 = dx2 + args[4];
                let dy3 = dy2 + args[5];
                let dx4 = dx3 + args[6];
                let dy4 = dy3 + args[7];
                let dx5 = dx4 + args[8];
                let dy5 = dy4 + args[9];
                // The last argument is along the axis with the larger
                // total displacement.
                if (dx5 - self.x).abs() > (dy5 - self.y).abs() {
                    self.x = dx5 + args[10];
                } else {
                    self.y = dy5 + args[10];
                }
                self.sink.curve_to(dx1, dy1, dx2, dy2, dx3, dy3);
                self.sink.curve_to(dx4, dy4, dx5, dy5, self.x, self.y);
                self.stack.clear();
            }
            Return => return Ok(Flow::Return),
            // Spec: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=21>
            EndChar => {
                let len = self.stack.len();
                self.read_width(len == 1 || len == 5)?;
                if self.is_open {
                    self.is_open = false;
                    self.sink.close();
                }
                self.stack.clear();
                return Ok(Flow::End);
            }
            HStem | VStem | HStemHm | VStemHm => {
                self.read_width(self.stack.len_is_odd())?;
                self.stems(matches!(operator, HStem | HStemHm))?;
            }
            // Any pairs on the stack are an implied vstemhm. The mask has
            // one bit per stem, rounded up to whole bytes.
            // Spec: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=24>
            HintMask | CntrMask => {
                self.read_width(self.stack.len_is_odd())?;
                self.stems(false)?;
                let stem_count = self.summary.hstem_count + self.summary.vstem_count;
                let mask_len = stem_count.div_ceil(8).max(1);
                let mask = cursor.read_array::<u8>(mask_len)?;
                if operator == HintMask {
                    self.sink.hint_mask(mask);
                } else {
                    self.sink.counter_mask(mask);
                }
            }
            // Spec: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=16>
            RMoveTo => {
                self.read_width(self.stack.len() == 3)?;
                self.open_subpath();
                let [dx, dy] = self.stack.fixed_array::<2>(0)?;
                self.x += dx;
                self.y += dy;
                self.sink.move_to(self.x, self.y);
                self.stack.clear();
            }
            HMoveTo | VMoveTo => {
                self.read_width(self.stack.len() == 2)?;
                self.open_subpath();
                let delta = self.stack.get_fixed(0).map_err(|_| Error::StackUnderflow)?;
                if operator == HMoveTo {
                    self.x += delta;
                } else {
                    self.y += delta;
                }
                self.sink.move_to(self.x, self.y);
                self.stack.clear();
            }
            RLineTo => {
                self.stack.verify_at_least_len(2)?;
                let mut i = 0;
                while i < self.stack.len() {
                    let [dx, dy] = self.stack.fixed_array::<2>(i)?;
                    self.x += dx;
                    self.y += dy;
                    self.sink.line_to(self.x, self.y);
                    i += 2;
                }
                self.stack.clear();
            }
            // Alternating horizontal and vertical lines
            HLineTo | VLineTo => {
                self.stack.verify_at_least_len(1)?;
                let mut is_x = operator == HLineTo;
                for i in 0..self.stack.len() {
                    let delta = self.stack.get_fixed(i)?;
                    if is_x {
                        self.x += delta;
                    } else {
                        self.y += delta;
                    }
                    is_x = !is_x;
                    self.sink.line_to(self.x, self.y);
                }
                self.stack.clear();
            }
            // Curves that start and end horizontal. An odd leading operand
            // is the first curve's starting dy.
            HhCurveTo => {
                let mut i = 0;
                if self.stack.len_is_odd() {
                    self.y += self.stack.get_fixed(0)?;
                    i += 1;
                }
                self.stack.verify_at_least_len(i + 4)?;
                while i + 4 <= self.stack.len() {
                    let args = self.stack.fixed_array::<4>(i)?;
                    let x1 = self.x + args[0];
                    let y1 = self.y;
                    let x2 = x1 + args[1];
                    let y2 = y1 + args[2];
                    self.x = x2 + args[3];
                    self.y = y2;
                    self.sink.curve_to(x1, y1, x2, y2, self.x, self.y);
                    i += 4;
                }
                self.stack.clear();
            }
            // Curves that start and end vertical. An odd leading operand
            // is the first curve's starting dx.
            VvCurveTo => {
                let mut i = 0;
                if self.stack.len_is_odd() {
                    self.x += self.stack.get_fixed(0)?;
                    i += 1;
                }
                self.stack.verify_at_least_len(i + 4)?;
                while i + 4 <= self.stack.len() {
                    let args = self.stack.fixed_array::<4>(i)?;
                    let x1 = self.x;
                    let y1 = self.y + args[0];
                    let x2 = x1 + args[1];
                    let y2 = y1 + args[2];
                    self.x = x2;
                    self.y = y2 + args[3];
                    self.sink.curve_to(x1, y1, x2, y2, self.x, self.y);
                    i += 4;
                }
                self.stack.clear();
            }
            // Curves alternating between horizontal and vertical tangents.
            // A trailing odd operand is the final curve's last coordinate
            // along the other axis.
            // Spec: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=17>
            HvCurveTo | VhCurveTo => {
                let count = self.stack.len();
                self.stack.verify_at_least_len(4)?;
                let mut i = 0;
                let mut horizontal = operator == HvCurveTo;
                while i + 4 <= count {
                    let args = self.stack.fixed_array::<4>(i)?;
                    let extra = if count - i == 5 {
                        Some(self.stack.get_fixed(i + 4)?)
                    } else {
                        None
                    };
                    let (x1, y1, x2, y2, x3, y3);
                    if horizontal {
                        x1 = self.x + args[0];
                        y1 = self.y;
                        x2 = x1 + args[1];
                        y2 = y1 + args[2];
                        y3 = y2 + args[3];
                        x3 = x2 + extra.unwrap_or_default();
                    } else {
                        x1 = self.x;
                        y1 = self.y + args[0];
                        x2 = x1 + args[1];
                        y2 = y1 + args[2];
                        x3 = x2 + args[3];
                        y3 = y2 + extra.unwrap_or_default();
                    }
                    self.sink.curve_to(x1, y1, x2, y2, x3, y3);
                    self.x = x3;
                    self.y = y3;
                    horizontal = !horizontal;
                    i += if extra.is_some() { 5 } else { 4 };
                }
                self.stack.clear();
            }
            // A sequence of curves possibly followed by a line
            RrCurveTo | RCurveLine => {
                let count = self.stack.len();
                self.stack.verify_at_least_len(6)?;
                let mut i = 0;
                while i + 6 <= count {
                    let args = self.stack.fixed_array::<6>(i)?;
                    let x1 = self.x + args[0];
                    let y1 = self.y + args[1];
                    let x2 = x1 + args[2];
                    let y2 = y1 + args[3];
                    self.x = x2 + args[4];
                    self.y = y2 + args[5];
                    self.sink.curve_to(x1, y1, x2, y2, self.x, self.y);
                    i += 6;
                }
                if operator == RCurveLine {
                    let [dx, dy] = self.stack.fixed_array::<2>(i)?;
                    self.x += dx;
                    self.y += dy;
                    self.sink.line_to(self.x, self.y);
                }
                self.stack.clear();
            }
            // A sequence of lines followed by a curve
            RLineCurve => {
                let curve_start = self
                    .stack
                    .len()
                    .checked_sub(6)
                    .ok_or(Error::StackUnderflow)?;
                let mut i = 0;
                while i + 2 <= curve_start {
                    let [dx, dy] = self.stack.fixed_array::<2>(i)?;
                    self.x += dx;
                    self.y += dy;
                    self.sink.line_to(self.x, self.y);
                    i += 2;
                }
                let args = self.stack.fixed_array::<6>(curve_start)?;
                let x1 = self.x + args[0];
                let y1 = self.y + args[1];
                let x2 = x1 + args[2];
                let y2 = y1 + args[3];
                self.x = x2 + args[4];
                self.y = y2 + args[5];
                self.sink.curve_to(x1, y1, x2, y2, self.x, self.y);
                self.stack.clear();
            }
            // Spec: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=29>
            CallSubr | CallGsubr => {
                let subrs = if operator == CallSubr {
                    self.subrs.ok_or(Error::MissingSubroutines)?
                } else {
                    self.global_subrs
                };
                let bias = subr_bias(subrs.count(), self.charstring_type);
                let biased_index = self.stack.pop_i32()?.saturating_add(bias);
                if biased_index < 0 || biased_index as u32 >= subrs.count() {
                    return Err(Error::InvalidSubroutineIndex(biased_index));
                }
                return Ok(Flow::Call(subrs.get(biased_index as usize)?));
            }
            And | Or => {
                let b = self.stack.pop_number()?.to_f64() != 0.0;
                let a = self.stack.pop_number()?.to_f64() != 0.0;
                let result = if operator == And { a && b } else { a || b };
                self.stack.push_i32(result as i32);
            }
            Not => {
                let a = self.stack.pop_number()?.to_f64();
                self.stack.push_i32((a == 0.0) as i32);
            }
            Eq => {
                let b = self.stack.pop_number()?.to_f64();
                let a = self.stack.pop_number()?.to_f64();
                self.stack.push_i32((a == b) as i32);
            }
            Abs => {
                let result = match self.stack.pop_number()? {
                    Number::Integer(a) => integer_or_real(a.checked_abs(), (a as f64).abs()),
                    Number::Real(a) => Number::Real(a.abs()),
                };
                self.stack.push(result);
            }
            Neg => {
                let result = match self.stack.pop_number()? {
                    Number::Integer(a) => integer_or_real(a.checked_neg(), -(a as f64)),
                    Number::Real(a) => Number::Real(-a),
                };
                self.stack.push(result);
            }
            Add | Sub | Mul => {
                let b = self.stack.pop_number()?;
                let a = self.stack.pop_number()?;
                let result = match (a, b, operator) {
                    (Number::Integer(a), Number::Integer(b), Add) => {
                        integer_or_real(a.checked_add(b), a as f64 + b as f64)
                    }
                    (Number::Integer(a), Number::Integer(b), Sub) => {
                        integer_or_real(a.checked_sub(b), a as f64 - b as f64)
                    }
                    (Number::Integer(a), Number::Integer(b), _) => {
                        integer_or_real(a.checked_mul(b), a as f64 * b as f64)
                    }
                    (a, b, Add) => Number::Real(a.to_f64() + b.to_f64()),
                    (a, b, Sub) => Number::Real(a.to_f64() - b.to_f64()),
                    (a, b, _) => Number::Real(a.to_f64() * b.to_f64()),
                };
                self.stack.push(result);
            }
            Div => {
                let b = self.stack.pop_number()?;
                let a = self.stack.pop_number()?;
                let result = match (a, b) {
                    (_, b) if b.to_f64() == 0.0 => {
                        log::debug!("division by zero in charstring; using 0");
                        Number::Integer(0)
                    }
                    (Number::Integer(a), Number::Integer(b)) if a.checked_rem(b) == Some(0) => {
                        integer_or_real(a.checked_div(b), a as f64 / b as f64)
                    }
                    (a, b) => Number::Real(a.to_f64() / b.to_f64()),
                };
                self.stack.push(result);
            }
            Sqrt => {
                let a = self.stack.pop_number()?.to_f64();
                self.stack.push(Number::Real(a.max(0.0).sqrt()));
            }
            Drop => {
                self.stack.pop_number()?;
            }
            Dup => self.stack.duplicate()?,
            Exch => self.stack.exchange()?,
            // val i put
            Put => {
                let i = self.stack.pop_i32()?;
                let value = self.stack.pop_number()?;
                *self.transient_slot(i)? = value;
            }
            // i get
            Get => {
                let i = self.stack.pop_i32()?;
                let value = *self.transient_slot(i)?;
                self.stack.push(value);
            }
            Random => {
                let value = self.next_random();
                self.stack.push(Number::Real(value));
            }
            IfElse | IndexOp | Roll => {
                let unimplemented = match operator {
                    IfElse => UnimplementedOperator::IfElse,
                    IndexOp => UnimplementedOperator::Index,
                    _ => UnimplementedOperator::Roll,
                };
                log::warn!("charstring operator {unimplemented:?} is not implemented; ignoring");
                self.summary.unimplemented.push(unimplemented);
            }
        }
        Ok(Flow::Continue)
    }

    fn transient_slot(&mut self, index: i32) -> Result<&mut Number, Error> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.transient.get_mut(i))
            .ok_or(Error::InvalidTransientIndex(index))
    }

    /// Returns the next value in (0, 1] from a xorshift sequence.
    fn next_random(&mut self) -> f64 {
        let mut state = self.random_state;
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        self.random_state = state;
        ((state >> 16) as f64 + 1.0) / 65536.0
    }
}

fn integer_or_real(value: Option<i32>, fallback: f64) -> Number {
    value.map(Number::Integer).unwrap_or(Number::Real(fallback))
}

/// Type 2 charstring operator.
///
/// See "Appendix A Type 2 Charstring Command Codes" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=31>
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Operator {
    HStem,
    VStem,
    VMoveTo,
    RLineTo,
    HLineTo,
    VLineTo,
    RrCurveTo,
    CallSubr,
    Return,
    EndChar,
    HStemHm,
    HintMask,
    CntrMask,
    RMoveTo,
    HMoveTo,
    VStemHm,
    RCurveLine,
    RLineCurve,
    VvCurveTo,
    HhCurveTo,
    CallGsubr,
    VhCurveTo,
    HvCurveTo,
    And,
    Or,
    Not,
    Abs,
    Add,
    Sub,
    Div,
    Neg,
    Eq,
    Drop,
    Put,
    Get,
    IfElse,
    Random,
    Mul,
    Sqrt,
    Dup,
    Exch,
    IndexOp,
    Roll,
    HFlex,
    Flex,
    HFlex1,
    Flex1,
}

impl Operator {
    fn read(cursor: &mut Cursor, b0: u8) -> Result<Self, Error> {
        // Escape opcode for accessing two byte operators
        const ESCAPE: u8 = 12;
        let (opcode, operator) = if b0 == ESCAPE {
            let b1 = cursor.read::<u8>()?;
            (b1, Self::from_two_byte_opcode(b1))
        } else {
            (b0, Self::from_opcode(b0))
        };
        operator.ok_or(Error::InvalidCharstringOperator(opcode))
    }

    fn from_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            1 => HStem,
            3 => VStem,
            4 => VMoveTo,
            5 => RLineTo,
            6 => HLineTo,
            7 => VLineTo,
            8 => RrCurveTo,
            10 => CallSubr,
            11 => Return,
            14 => EndChar,
            18 => HStemHm,
            19 => HintMask,
            20 => CntrMask,
            21 => RMoveTo,
            22 => HMoveTo,
            23 => VStemHm,
            24 => RCurveLine,
            25 => RLineCurve,
            26 => VvCurveTo,
            27 => HhCurveTo,
            29 => CallGsubr,
            30 => VhCurveTo,
            31 => HvCurveTo,
            _ => return None,
        })
    }

    /// These are preceded by a byte containing the escape value of 12.
    fn from_two_byte_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            3 => And,
            4 => Or,
            5 => Not,
            9 => Abs,
            10 => Add,
            11 => Sub,
            12 => Div,
            14 => Neg,
            15 => Eq,
            18 => Drop,
            20 => Put,
            21 => Get,
            22 => IfElse,
            23 => Random,
            24 => Mul,
            26 => Sqrt,
            27 => Dup,
            28 => Exch,
            29 => IndexOp,
            30 => Roll,
            34 => HFlex,
            35 => Flex,
            36 => HFlex1,
            37 => Flex1,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_test_data::cff::{charstring, cs_ops::*, index, Cs, Cs::*};

    #[derive(Copy, Clone, PartialEq, Debug)]
    enum Command {
        MoveTo(f64, f64),
        LineTo(f64, f64),
        CurveTo(f64, f64, f64, f64, f64, f64),
        Close,
    }

    #[derive(PartialEq, Default, Debug)]
    struct CaptureCommandSink {
        commands: Vec<Command>,
        hstems: Vec<(f64, f64)>,
        vstems: Vec<(f64, f64)>,
        masks: Vec<Vec<u8>>,
    }

    impl CommandSink for CaptureCommandSink {
        fn move_to(&mut self, x: Fixed, y: Fixed) {
            self.commands.push(Command::MoveTo(x.to_f64(), y.to_f64()))
        }

        fn line_to(&mut self, x: Fixed, y: Fixed) {
            self.commands.push(Command::LineTo(x.to_f64(), y.to_f64()))
        }

        fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed) {
            self.commands.push(Command::CurveTo(
                cx0.to_f64(),
                cy0.to_f64(),
                cx1.to_f64(),
                cy1.to_f64(),
                x.to_f64(),
                y.to_f64(),
            ))
        }

        fn close(&mut self) {
            self.commands.push(Command::Close)
        }

        fn hstem(&mut self, y: Fixed, dy: Fixed) {
            self.hstems.push((y.to_f64(), dy.to_f64()))
        }

        fn vstem(&mut self, x: Fixed, dx: Fixed) {
            self.vstems.push((x.to_f64(), dx.to_f64()))
        }

        fn hint_mask(&mut self, mask: &[u8]) {
            self.masks.push(mask.to_vec())
        }
    }

    fn run(items: &[Cs]) -> Result<(EvaluationSummary, CaptureCommandSink), Error> {
        run_with_subrs(items, &[], None)
    }

    fn run_with_subrs(
        items: &[Cs],
        global_subrs: &[Vec<u8>],
        local_subrs: Option<&[Vec<u8>]>,
    ) -> Result<(EvaluationSummary, CaptureCommandSink), Error> {
        let global_data = index(global_subrs);
        let local_data = local_subrs.map(index);
        let global = Index::new(&global_data)?;
        let local = local_data.as_deref().map(Index::new).transpose()?;
        let mut sink = CaptureCommandSink::default();
        let data = charstring(items);
        let summary = evaluate(&data, 2, global, local, &mut sink)?;
        Ok((summary, sink))
    }

    /// Evaluates arithmetic followed by `rmoveto` with the results.
    fn arith(items: &[Cs]) -> (f64, f64) {
        let mut all = items.to_vec();
        all.extend([Op(RMOVETO), Op(ENDCHAR)]);
        let (_, sink) = run(&all).unwrap();
        match sink.commands[0] {
            Command::MoveTo(x, y) => (x, y),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn lines_and_width() {
        use Command::*;
        let (summary, sink) = run(&[
            N(100),
            N(10),
            N(20),
            Op(RMOVETO),
            N(500),
            N(700),
            N(-500),
            Op(HLINETO),
            N(30),
            N(-40),
            Op(RLINETO),
            Op(ENDCHAR),
        ])
        .unwrap();
        assert_eq!(summary.width, Some(Fixed::from_i32(100)));
        assert_eq!(
            sink.commands,
            [
                MoveTo(10.0, 20.0),
                LineTo(510.0, 20.0),
                LineTo(510.0, 720.0),
                LineTo(10.0, 720.0),
                LineTo(40.0, 680.0),
                Close,
            ]
        );
    }

    #[test]
    fn width_is_only_read_once() {
        // the first operator has no width so the odd count on the second
        // stem operator is not a width
        let (summary, sink) = run(&[
            N(10),
            N(20),
            Op(HSTEM),
            N(5),
            N(30),
            N(40),
            Op(VSTEM),
            Op(ENDCHAR),
        ])
        .unwrap();
        assert_eq!(summary.width, None);
        assert_eq!(sink.hstems, [(10.0, 30.0)]);
        assert_eq!(sink.vstems, [(5.0, 35.0)]);
        assert_eq!(summary.vstem_count, 1);
    }

    #[test]
    fn endchar_width() {
        let (summary, sink) = run(&[N(-25), Op(ENDCHAR)]).unwrap();
        assert_eq!(summary.width, Some(Fixed::from_i32(-25)));
        assert!(sink.commands.is_empty());
        let (summary, _) = run(&[N(1), N(2), Op(ENDCHAR)]).unwrap();
        assert_eq!(summary.width, None);
    }

    #[test]
    fn moveto_width() {
        use Command::*;
        let (summary, sink) = run(&[N(40), N(15), Op(HMOVETO), N(25), Op(VMOVETO)]).unwrap();
        assert_eq!(summary.width, Some(Fixed::from_i32(40)));
        assert_eq!(sink.commands, [MoveTo(15.0, 0.0), Close, MoveTo(15.0, 25.0)]);
    }

    #[test]
    fn hintmask_with_implicit_vstems() {
        use Command::*;
        let (summary, sink) = run(&[
            N(99),
            N(0),
            N(10),
            N(100),
            N(20),
            Op(HSTEMHM),
            N(50),
            N(10),
            Op(HINTMASK),
            Byte(0b1110_0000),
            N(1),
            N(2),
            Op(RMOVETO),
            Op(ENDCHAR),
        ])
        .unwrap();
        assert_eq!(summary.width, Some(Fixed::from_i32(99)));
        assert_eq!(summary.hstem_count, 2);
        assert_eq!(summary.vstem_count, 1);
        assert_eq!(sink.hstems, [(0.0, 10.0), (110.0, 130.0)]);
        assert_eq!(sink.vstems, [(50.0, 60.0)]);
        assert_eq!(sink.masks, [vec![0b1110_0000]]);
        assert_eq!(sink.commands, [MoveTo(1.0, 2.0), Close]);
    }

    #[test]
    fn hintmask_spans_bytes() {
        let mut items = vec![];
        for i in 0..9 {
            items.extend([N(i * 10), N(5)]);
        }
        items.extend([
            Op(HSTEMHM),
            Op(HINTMASK),
            Byte(0xFF),
            Byte(0x80),
            N(0),
            N(0),
            Op(RMOVETO),
            Op(ENDCHAR),
        ]);
        let (summary, sink) = run(&items).unwrap();
        assert_eq!(summary.hstem_count, 9);
        assert_eq!(sink.masks, [vec![0xFF, 0x80]]);
    }

    #[test]
    fn hintmask_without_stems_reads_one_byte() {
        let (_, sink) = run(&[
            Op(HINTMASK),
            Byte(0),
            N(0),
            N(0),
            Op(RMOVETO),
            Op(ENDCHAR),
        ])
        .unwrap();
        assert_eq!(sink.masks, [vec![0]]);
        assert_eq!(sink.commands.len(), 2);
    }

    #[test]
    fn subroutines() {
        use Command::*;
        let global = vec![charstring(&[N(10), N(0), Op(RLINETO), Op(RETURN)])];
        // the local subroutine falls off the end rather than returning
        let local = vec![
            charstring(&[N(0), N(10), Op(RLINETO)]),
            charstring(&[N(-107), Op(CALLGSUBR), N(-107), Op(CALLSUBR), Op(RETURN)]),
        ];
        let (_, sink) = run_with_subrs(
            &[
                N(0),
                N(0),
                Op(RMOVETO),
                N(-106),
                Op(CALLSUBR),
                N(5),
                N(5),
                Op(RLINETO),
                Op(ENDCHAR),
            ],
            &global,
            Some(&local[..]),
        )
        .unwrap();
        assert_eq!(
            sink.commands,
            [
                MoveTo(0.0, 0.0),
                LineTo(10.0, 0.0),
                LineTo(10.0, 10.0),
                LineTo(15.0, 15.0),
                Close,
            ]
        );
    }

    #[test]
    fn single_global_subroutine() {
        use Command::*;
        let global = vec![charstring(&[N(100), N(0), Op(RLINETO), Op(RETURN)])];
        let (_, sink) = run_with_subrs(
            &[
                N(0),
                N(0),
                Op(RMOVETO),
                N(-107),
                Op(CALLGSUBR),
                Op(ENDCHAR),
            ],
            &global,
            None,
        )
        .unwrap();
        assert_eq!(
            sink.commands,
            [MoveTo(0.0, 0.0), LineTo(100.0, 0.0), Close]
        );
    }

    #[test]
    fn subroutine_errors() {
        assert_eq!(
            run(&[N(0), Op(CALLSUBR)]).unwrap_err(),
            Error::MissingSubroutines
        );
        let local = vec![charstring(&[Op(RETURN)])];
        assert_eq!(
            run_with_subrs(&[N(-106), Op(CALLSUBR)], &[], Some(&local[..])).unwrap_err(),
            Error::InvalidSubroutineIndex(1)
        );
        assert_eq!(
            run_with_subrs(&[N(-108), Op(CALLGSUBR)], &local, None).unwrap_err(),
            Error::InvalidSubroutineIndex(-1)
        );
    }

    #[test]
    fn nesting_limit() {
        // a subroutine that calls itself forever
        let local = vec![charstring(&[N(-107), Op(CALLSUBR)])];
        assert_eq!(
            run_with_subrs(&[N(-107), Op(CALLSUBR)], &[], Some(&local[..])).unwrap_err(),
            Error::CharstringNestingDepthLimitExceeded
        );
        // ten levels deep is fine
        let mut chain: Vec<Vec<u8>> = (0..9)
            .map(|i| charstring(&[N(i - 106), Op(CALLSUBR), Op(RETURN)]))
            .collect();
        chain.push(charstring(&[N(1), N(1), Op(RLINETO), Op(RETURN)]));
        let (_, sink) = run_with_subrs(
            &[N(0), N(0), Op(RMOVETO), N(-107), Op(CALLSUBR), Op(ENDCHAR)],
            &[],
            Some(&chain[..]),
        )
        .unwrap();
        assert_eq!(sink.commands[1], Command::LineTo(1.0, 1.0));
    }

    #[test]
    fn curves() {
        use Command::*;
        let (_, sink) = run(&[
            N(0),
            N(0),
            Op(RMOVETO),
            N(10),
            N(20),
            N(30),
            N(40),
            Op(VHCURVETO),
            N(10),
            N(20),
            N(30),
            N(40),
            N(5),
            Op(HVCURVETO),
            N(1),
            N(2),
            N(3),
            N(4),
            N(5),
            Op(VVCURVETO),
            N(1),
            N(2),
            N(3),
            N(4),
            Op(HHCURVETO),
            Op(ENDCHAR),
        ])
        .unwrap();
        assert_eq!(
            sink.commands,
            [
                MoveTo(0.0, 0.0),
                CurveTo(0.0, 10.0, 20.0, 40.0, 60.0, 40.0),
                CurveTo(70.0, 40.0, 90.0, 70.0, 95.0, 110.0),
                CurveTo(96.0, 112.0, 99.0, 116.0, 99.0, 121.0),
                CurveTo(100.0, 121.0, 102.0, 124.0, 106.0, 124.0),
                Close,
            ]
        );
    }

    #[test]
    fn alternating_curves_with_trailing_operand() {
        use Command::*;
        let (_, sink) = run(&[
            N(0),
            N(0),
            Op(RMOVETO),
            N(10),
            N(10),
            N(10),
            N(10),
            N(20),
            N(20),
            N(20),
            N(20),
            N(7),
            Op(VHCURVETO),
            Op(ENDCHAR),
        ])
        .unwrap();
        assert_eq!(
            sink.commands,
            [
                MoveTo(0.0, 0.0),
                CurveTo(0.0, 10.0, 10.0, 20.0, 20.0, 20.0),
                CurveTo(40.0, 20.0, 60.0, 40.0, 67.0, 60.0),
                Close,
            ]
        );
    }

    #[test]
    fn line_curve_combinations() {
        use Command::*;
        let (_, sink) = run(&[
            N(0),
            N(0),
            Op(RMOVETO),
            N(1),
            N(1),
            N(1),
            N(1),
            N(1),
            N(1),
            N(10),
            N(0),
            Op(RCURVELINE),
            N(0),
            N(10),
            N(1),
            N(1),
            N(1),
            N(1),
            N(1),
            N(1),
            Op(RLINECURVE),
            Op(ENDCHAR),
        ])
        .unwrap();
        assert_eq!(
            sink.commands,
            [
                MoveTo(0.0, 0.0),
                CurveTo(1.0, 1.0, 2.0, 2.0, 3.0, 3.0),
                LineTo(13.0, 3.0),
                LineTo(13.0, 13.0),
                CurveTo(14.0, 14.0, 15.0, 15.0, 16.0, 16.0),
                Close,
            ]
        );
        assert_eq!(
            run(&[N(0), N(0), Op(RMOVETO), N(1), Op(RLINECURVE)]).unwrap_err(),
            Error::StackUnderflow
        );
    }

    #[test]
    fn flex_emits_two_curves() {
        use Command::*;
        let mut items = vec![N(0), N(0), Op(RMOVETO)];
        items.extend((1..=12).map(N));
        items.extend([N(50), Escape(FLEX), Op(ENDCHAR)]);
        let (_, sink) = run(&items).unwrap();
        assert_eq!(
            sink.commands,
            [
                MoveTo(0.0, 0.0),
                CurveTo(1.0, 2.0, 4.0, 6.0, 9.0, 12.0),
                CurveTo(16.0, 20.0, 25.0, 30.0, 36.0, 42.0),
                Close,
            ]
        );
    }

    #[test]
    fn hflex_variants() {
        use Command::*;
        let (_, sink) = run(&[
            N(0),
            N(0),
            Op(RMOVETO),
            N(10),
            N(10),
            N(10),
            N(10),
            N(10),
            N(10),
            N(10),
            Escape(HFLEX),
            N(10),
            N(5),
            N(10),
            N(5),
            N(10),
            N(10),
            N(10),
            N(-10),
            N(10),
            Escape(HFLEX1),
            N(10),
            N(1),
            N(10),
            N(1),
            N(10),
            N(1),
            N(10),
            N(-1),
            N(10),
            N(-1),
            N(5),
            Escape(FLEX1),
            Op(ENDCHAR),
        ])
        .unwrap();
        assert_eq!(
            sink.commands,
            [
                MoveTo(0.0, 0.0),
                CurveTo(10.0, 0.0, 20.0, 10.0, 30.0, 10.0),
                CurveTo(40.0, 10.0, 50.0, 0.0, 60.0, 0.0),
                CurveTo(70.0, 5.0, 80.0, 10.0, 90.0, 10.0),
                CurveTo(100.0, 10.0, 110.0, 0.0, 120.0, 0.0),
                CurveTo(130.0, 1.0, 140.0, 2.0, 150.0, 3.0),
                CurveTo(160.0, 2.0, 170.0, 1.0, 175.0, 0.0),
                Close,
            ]
        );
    }

    #[test]
    fn arithmetic() {
        assert_eq!(arith(&[N(10), N(3), Escape(SUB), N(4), Escape(MUL), N(0)]), (28.0, 0.0));
        assert_eq!(arith(&[N(7), N(2), Escape(DIV), N(-3), Escape(ABS)]), (3.5, 3.0));
        assert_eq!(arith(&[N(6), N(3), Escape(DIV), N(5), Escape(NEG)]), (2.0, -5.0));
        assert_eq!(arith(&[N(1), N(0), Escape(AND), N(1), N(0), Escape(OR)]), (0.0, 1.0));
        assert_eq!(arith(&[N(0), Escape(NOT), N(4), N(4), Escape(EQ)]), (1.0, 1.0));
        assert_eq!(arith(&[N(16), Escape(SQRT), N(9), Escape(DUP), Escape(ADD)]), (4.0, 18.0));
        assert_eq!(arith(&[N(1), N(2), Escape(EXCH)]), (2.0, 1.0));
        assert_eq!(arith(&[N(1), N(2), N(3), Escape(DROP)]), (1.0, 2.0));
        assert_eq!(arith(&[F(1.5), F(2.25), Escape(ADD), N(0)]), (3.75, 0.0));
        assert_eq!(arith(&[N(5), N(0), Escape(DIV), N(0)]), (0.0, 0.0));
    }

    #[test]
    fn transient_array() {
        assert_eq!(
            arith(&[N(42), N(3), Escape(PUT), N(3), Escape(GET), N(31), Escape(GET)]),
            (42.0, 0.0)
        );
        assert_eq!(
            run(&[N(1), N(32), Escape(PUT)]).unwrap_err(),
            Error::InvalidTransientIndex(32)
        );
        assert_eq!(
            run(&[N(-1), Escape(GET)]).unwrap_err(),
            Error::InvalidTransientIndex(-1)
        );
    }

    #[test]
    fn random_is_deterministic() {
        let items = [Escape(RANDOM), Escape(RANDOM), Op(RMOVETO), Op(ENDCHAR)];
        let first = run(&items).unwrap().1.commands;
        let second = run(&items).unwrap().1.commands;
        assert_eq!(first, second);
        let Command::MoveTo(x, y) = first[0] else {
            panic!("expected a move");
        };
        for value in [x, y] {
            assert!(value > 0.0 && value <= 1.0, "{value} out of range");
        }
    }

    #[test]
    fn unimplemented_operators_are_recorded() {
        let (summary, sink) = run(&[
            N(1),
            N(2),
            N(3),
            N(4),
            Escape(IFELSE),
            Escape(ROLL),
            Escape(INDEX),
            Escape(DROP),
            Escape(DROP),
            Op(RMOVETO),
            Op(ENDCHAR),
        ])
        .unwrap();
        assert_eq!(
            summary.unimplemented,
            [
                UnimplementedOperator::IfElse,
                UnimplementedOperator::Roll,
                UnimplementedOperator::Index
            ]
        );
        assert_eq!(sink.commands[0], Command::MoveTo(1.0, 2.0));
    }

    #[test]
    fn stack_overflow_drops_operands() {
        let mut items: Vec<Cs> = (0..60).map(|_| N(1)).collect();
        items.extend([Op(RLINETO), Op(ENDCHAR)]);
        let (_, sink) = run(&items).unwrap();
        assert_eq!(sink.commands.len(), 24);
    }

    #[test]
    fn invalid_operators() {
        assert_eq!(run(&[Op(2)]).unwrap_err(), Error::InvalidCharstringOperator(2));
        assert_eq!(
            run(&[Escape(0)]).unwrap_err(),
            Error::InvalidCharstringOperator(0)
        );
        assert_eq!(run(&[Op(RMOVETO)]).unwrap_err(), Error::StackUnderflow);
    }
}
