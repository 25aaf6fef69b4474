use serde::Serialize;

use crate::errors::{AppError, AppResult};

/// Page sizes offered by the question-per-page selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
pub enum PageSize {
    One,
    Five,
    #[default]
    Ten,
    Twenty,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 5] = [
        PageSize::One,
        PageSize::Five,
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Fifty,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::One => 1,
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = AppError;

    fn try_from(value: usize) -> AppResult<Self> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or_else(|| {
                AppError::InvalidParameter(format!(
                    "page size must be one of 1, 5, 10, 20 or 50 (got {})",
                    value
                ))
            })
    }
}

pub fn total_pages(total: usize, page_size: PageSize) -> usize {
    total.div_ceil(page_size.get())
}

/// `(start inclusive, end exclusive)` indices of the questions on `page_index`.
pub fn page_window(total: usize, page_size: PageSize, page_index: usize) -> (usize, usize) {
    let start = page_index * page_size.get();
    let end = (start + page_size.get()).min(total);
    (start, end)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NavState {
    pub first_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub last_enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pagination {
    page_size: PageSize,
    current_page: usize,
    total_questions: usize,
}

impl Pagination {
    pub fn new(total_questions: usize, page_size: PageSize) -> Self {
        Self {
            page_size,
            current_page: 0,
            total_questions,
        }
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_questions, self.page_size)
    }

    pub fn window(&self) -> (usize, usize) {
        page_window(self.total_questions, self.page_size, self.current_page)
    }

    fn last_index(&self) -> usize {
        self.total_pages().saturating_sub(1)
    }

    pub fn first(&mut self) {
        self.current_page = 0;
    }

    pub fn prev(&mut self) {
        self.current_page = self.current_page.saturating_sub(1);
    }

    pub fn next(&mut self) {
        self.current_page = (self.current_page + 1).min(self.last_index());
    }

    pub fn last(&mut self) {
        self.current_page = self.last_index();
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.current_page = 0;
    }

    pub fn set_total_questions(&mut self, total_questions: usize) {
        self.total_questions = total_questions;
        self.current_page = self.current_page.min(self.last_index());
    }

    pub fn nav_state(&self) -> NavState {
        let at_start = self.current_page == 0;
        let at_end = self.current_page >= self.last_index();
        NavState {
            first_enabled: !at_start,
            prev_enabled: !at_start,
            next_enabled: !at_end,
            last_enabled: !at_end,
        }
    }
}
