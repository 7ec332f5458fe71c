#![allow(non_snake_case)]

use prelude::*;

// Algorithm from: Higham, Nicholas J. The Scaling and Squaring Method for the Matrix Exponential
// Revisited.
// Based on MatrixBase::exp() from Eigen unsupported.
pub fn expm(A: &Matrix) -> Matrix {
    let (U, V, num_squarings) = compute_uv(A);

    // Pade approximant is (U+V) / (-U+V)
    let mut numer = &U + &V;
    let denom = -U + V;
    if !denom.lu().solve_mut(&mut numer) {
        panic!("system not invertible");
    }
    let mut result = numer;

    for _ in 0..num_squarings {
        // undo scaling by repeated squaring
        result = &result * &result;
    }
    result
}

fn compute_uv(A: &Matrix) -> (Matrix, Matrix, u32) {
    let mut l1_norm = 0.0;
    for i in 0..A.ncols() {
        let abs_col_sum = A.column(i).iter().map(|v| v.abs()).sum();
        if abs_col_sum > l1_norm {
            l1_norm = abs_col_sum;
        }
    }

    if l1_norm < 1.495585217958292e-2 {
        let (U, V) = pade3(A);
        (U, V, 0)
    } else if l1_norm < 2.539398330063230e-1 {
        let (U, V) = pade5(A);
        (U, V, 0)
    } else if l1_norm < 9.504178996162932e-1 {
        let (U, V) = pade7(A);
        (U, V, 0)
    } else if l1_norm < 2.097847961257068 {
        let (U, V) = pade9(A);
        (U, V, 0)
    } else {
        const MAX_NORM: f64 = 5.371920351148152;
        let mut num_squarings = (l1_norm / MAX_NORM).log2().ceil() as i32;
        if num_squarings < 0 {
            num_squarings = 0;
        }
        let A = A.map(|v| v * 2f64.powi(-num_squarings));
        let (U, V) = pade13(A);
        (U, V, num_squarings as u32)
    }
}

fn pade3(A: &Matrix) -> (Matrix, Matrix) {
    const B: [f64; 4] = [120.0, 60.0, 12.0, 1.0];
    let I = Matrix::identity(A.nrows(), A.ncols());

    let A2 = A * A;

    let tmp = B[3] * &A2 + B[1] * &I;
    let U = A * tmp;
    let V = B[2] * A2 + B[0] * I;
    (U, V)
}

fn pade5(A: &Matrix) -> (Matrix, Matrix) {
    const B: [f64; 6] = [30240.0, 15120.0, 3360.0, 420.0, 30.0, 1.0];
    let I = Matrix::identity(A.nrows(), A.ncols());

    let A2 = A * A;
    let A4 = &A2 * &A2;

    let tmp = B[5] * &A4 + B[3] * &A2 + B[1] * &I;
    let U = A * tmp;
    let V = B[4] * A4 + B[2] * A2 + B[0] * I;
    (U, V)
}

fn pade7(A: &Matrix) -> (Matrix, Matrix) {
    const B: [f64; 8] = [
        17297280.0, 8648640.0, 1995840.0, 277200.0, 25200.0, 1512.0, 56.0, 1.0,
    ];
    let I = Matrix::identity(A.nrows(), A.ncols());

    let A2 = A * A;
    let A4 = &A2 * &A2;
    let A6 = &A4 * &A2;

    let tmp = B[7] * &A6 + B[5] * &A4 + B[3] * &A2 + B[1] * &I;
    let U = A * tmp;
    let V = B[6] * A6 + B[4] * A4 + B[2] * A2 + B[0] * I;
    (U, V)
}

fn pade9(A: &Matrix) -> (Matrix, Matrix) {
    const B: [f64; 10] = [
        17643225600.0,
        8821612800.0,
        2075673600.0,
        302702400.0,
        30270240.0,
        2162160.0,
        110880.0,
        3960.0,
        90.0,
        1.0,
    ];
    let I = Matrix::identity(A.nrows(), A.ncols());

    let A2 = A * A;
    let A4 = &A2 * &A2;
    let A6 = &A4 * &A2;
    let A8 = &A6 * &A2;

    let tmp = B[9] * &A8 + B[7] * &A6 + B[5] * &A4 + B[3] * &A2 + B[1] * &I;
    let U = A * tmp;
    let V = B[8] * A8 + B[6] * A6 + B[4] * A4 + B[2] * A2 + B[0] * I;
    (U, V)
}

fn pade13(A: Matrix) -> (Matrix, Matrix) {
    const B: [f64; 14] = [
        64764752532480000.0,
        32382376266240000.0,
        7771770303897600.0,
        1187353796428800.0,
        129060195264000.0,
        10559470521600.0,
        670442572800.0,
        33522128640.0,
        1323241920.0,
        40840800.0,
        960960.0,
        16380.0,
        182.0,
        1.0,
    ];
    let I = Matrix::identity(A.nrows(), A.ncols());

    let A2 = &A * &A;
    let A4 = &A2 * &A2;
    let A6 = &A4 * &A2;

    let V = B[13] * &A6 + B[11] * &A4 + B[9] * &A2; // used for temporary storage
    let tmp = &A6 * V + B[7] * &A6 + B[5] * &A4 + B[3] * &A2 + B[1] * &I;
    let U = A * tmp;

    let tmp = B[12] * &A6 + B[10] * &A4 + B[8] * &A2;
    let V = &A6 * tmp + B[6] * A6 + B[4] * A4 + B[2] * A2 + B[0] * I;
    (U, V)
}
